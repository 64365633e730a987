use chrono::Utc;
use rusqlite::{Connection, params};
use serde::Serialize;

/// One refinement pass over a section: the user's prompt plus the content
/// before and after. Kept as history; sections only store the latest text.
#[derive(Debug, Clone, Serialize)]
pub struct Refinement {
    pub id: i64,
    pub section_id: i64,
    pub prompt: String,
    pub previous_content: String,
    pub new_content: String,
    pub created_at: String,
}

pub fn create(
    conn: &Connection,
    section_id: i64,
    prompt: &str,
    previous_content: &str,
    new_content: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO refinements (section_id, prompt, previous_content, new_content, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![section_id, prompt, previous_content, new_content, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_for_section(conn: &Connection, section_id: i64) -> rusqlite::Result<Vec<Refinement>> {
    let mut stmt = conn.prepare(
        "SELECT id, section_id, prompt, previous_content, new_content, created_at \
         FROM refinements WHERE section_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map(params![section_id], |row| {
            Ok(Refinement {
                id: row.get("id")?,
                section_id: row.get("section_id")?,
                prompt: row.get("prompt")?,
                previous_content: row.get("previous_content")?,
                new_content: row.get("new_content")?,
                created_at: row.get("created_at")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
