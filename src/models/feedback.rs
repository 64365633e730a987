use chrono::Utc;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub id: i64,
    pub section_id: i64,
    pub feedback_type: String,
    pub comment: String,
    pub created_at: String,
}

pub fn create(
    conn: &Connection,
    section_id: i64,
    feedback_type: &str,
    comment: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO feedback (section_id, feedback_type, comment, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![section_id, feedback_type, comment, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_for_section(conn: &Connection, section_id: i64) -> rusqlite::Result<Vec<Feedback>> {
    let mut stmt = conn.prepare(
        "SELECT id, section_id, feedback_type, comment, created_at \
         FROM feedback WHERE section_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map(params![section_id], |row| {
            Ok(Feedback {
                id: row.get("id")?,
                section_id: row.get("section_id")?,
                feedback_type: row.get("feedback_type")?,
                comment: row.get("comment")?,
                created_at: row.get("created_at")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
