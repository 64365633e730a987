use serde::Serialize;

/// One ordered content unit of a project; rendered as one slide or one
/// document region on export.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub content: String,
    pub ord: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewSection {
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub ord: i64,
}
