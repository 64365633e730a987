use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        document_type: row.get("document_type")?,
        main_topic: row.get("main_topic")?,
        metadata_json: row.get("metadata_json")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn create(conn: &Connection, new: &NewProject) -> rusqlite::Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO projects (user_id, title, document_type, main_topic, metadata_json, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            new.user_id,
            new.title.trim(),
            new.document_type,
            new.main_topic,
            new.metadata_json,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Find a project by id, scoped to its owner. Returns None for other
/// users' projects so handlers can't leak existence.
pub fn find_owned(conn: &Connection, id: i64, user_id: i64) -> rusqlite::Result<Option<Project>> {
    conn.query_row(
        "SELECT id, user_id, title, document_type, main_topic, metadata_json, created_at, updated_at \
         FROM projects WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
        row_to_project,
    )
    .optional()
}

pub fn find_all_for_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<ProjectListItem>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.title, p.document_type, p.main_topic, \
                (SELECT COUNT(*) FROM sections s WHERE s.project_id = p.id) AS section_count, \
                p.created_at, p.updated_at \
         FROM projects p WHERE p.user_id = ?1 \
         ORDER BY p.updated_at DESC",
    )?;
    let items = stmt
        .query_map(params![user_id], |row| {
            Ok(ProjectListItem {
                id: row.get("id")?,
                title: row.get("title")?,
                document_type: row.get("document_type")?,
                main_topic: row.get("main_topic")?,
                section_count: row.get("section_count")?,
                created_at: row.get("created_at")?,
                updated_at: row.get("updated_at")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM projects WHERE id = ?1", params![id])
}

pub fn touch(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
        params![Utc::now().to_rfc3339(), id],
    )
}

pub fn stats_for_user(conn: &Connection, user_id: i64) -> rusqlite::Result<ProjectStats> {
    let count = |sql: &str| -> rusqlite::Result<i64> {
        conn.query_row(sql, params![user_id], |row| row.get(0))
    };

    Ok(ProjectStats {
        total_projects: count("SELECT COUNT(*) FROM projects WHERE user_id = ?1")?,
        docx_count: count(
            "SELECT COUNT(*) FROM projects WHERE user_id = ?1 AND document_type = 'docx'",
        )?,
        pptx_count: count(
            "SELECT COUNT(*) FROM projects WHERE user_id = ?1 AND document_type = 'pptx'",
        )?,
        generated_sections: count(
            "SELECT COUNT(*) FROM sections s \
             JOIN projects p ON s.project_id = p.id \
             WHERE p.user_id = ?1 AND s.content != ''",
        )?,
        total_refinements: count(
            "SELECT COUNT(*) FROM refinements r \
             JOIN sections s ON r.section_id = s.id \
             JOIN projects p ON s.project_id = p.id \
             WHERE p.user_id = ?1",
        )?,
        total_feedback: count(
            "SELECT COUNT(*) FROM feedback f \
             JOIN sections s ON f.section_id = s.id \
             JOIN projects p ON s.project_id = p.id \
             WHERE p.user_id = ?1",
        )?,
    })
}
