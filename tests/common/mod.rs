//! Shared test infrastructure for model and export tests.
//!
//! `setup_test_db()` opens a temporary SQLite database and runs the
//! schema; the seed helpers insert the rows most tests start from.

use rusqlite::Connection;
use tempfile::TempDir;

use draftdeck::db::MIGRATIONS;
use draftdeck::models::project::NewProject;
use draftdeck::models::section::NewSection;
use draftdeck::models::{project, section, user};

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_HASH: &str = "$argon2id$not-a-real-hash";

/// Temporary SQLite database with the full schema applied. The TempDir
/// must be kept alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS).expect("Failed to run migrations");

    (dir, conn)
}

pub fn seed_user(conn: &Connection) -> i64 {
    user::create(conn, TEST_EMAIL, TEST_HASH).expect("Failed to seed user")
}

pub fn seed_project(conn: &Connection, user_id: i64, document_type: &str) -> i64 {
    project::create(
        conn,
        &NewProject {
            user_id,
            title: "Quarterly Review".to_string(),
            document_type: document_type.to_string(),
            main_topic: "Company performance".to_string(),
            metadata_json: None,
        },
    )
    .expect("Failed to seed project")
}

pub fn seed_section(conn: &Connection, project_id: i64, title: &str, ord: i64) -> i64 {
    section::create(
        conn,
        &NewSection {
            project_id,
            title: title.to_string(),
            description: String::new(),
            ord,
        },
    )
    .expect("Failed to seed section")
}
