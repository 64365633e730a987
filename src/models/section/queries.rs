use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;

fn row_to_section(row: &rusqlite::Row) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        content: row.get("content")?,
        ord: row.get("ord")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

const SELECT_SECTION: &str =
    "SELECT id, project_id, title, description, content, ord, created_at, updated_at FROM sections";

pub fn create(conn: &Connection, new: &NewSection) -> rusqlite::Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO sections (project_id, title, description, content, ord, created_at, updated_at) \
         VALUES (?1, ?2, ?3, '', ?4, ?5, ?5)",
        params![new.project_id, new.title.trim(), new.description, new.ord, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All sections of a project in rendering order. `ord` values need not be
/// contiguous — sorted, never indexed.
pub fn find_ordered(conn: &Connection, project_id: i64) -> rusqlite::Result<Vec<Section>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_SECTION} WHERE project_id = ?1 ORDER BY ord ASC, id ASC"
    ))?;
    let sections = stmt
        .query_map(params![project_id], row_to_section)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sections)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Section>> {
    conn.query_row(
        &format!("{SELECT_SECTION} WHERE id = ?1"),
        params![id],
        row_to_section,
    )
    .optional()
}

pub fn update_content(conn: &Connection, id: i64, content: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE sections SET content = ?1, updated_at = ?2 WHERE id = ?3",
        params![content, Utc::now().to_rfc3339(), id],
    )
}
