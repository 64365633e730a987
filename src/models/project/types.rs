use serde::{Deserialize, Serialize};

/// The two artifact kinds this service exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Docx,
    Pptx,
}

impl DocumentType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "docx" => Some(DocumentType::Docx),
            "pptx" => Some(DocumentType::Pptx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Docx => "docx",
            DocumentType::Pptx => "pptx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentType::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub document_type: String,
    pub main_topic: String,
    pub metadata_json: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    /// Document type as enum. Rows are constrained by the schema, so an
    /// unknown value only appears if the DB was edited by hand.
    pub fn doc_type(&self) -> DocumentType {
        DocumentType::parse(&self.document_type).unwrap_or(DocumentType::Docx)
    }
}

/// Summary row for the project list view.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListItem {
    pub id: i64,
    pub title: String,
    pub document_type: String,
    pub main_topic: String,
    pub section_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: i64,
    pub title: String,
    pub document_type: String,
    pub main_topic: String,
    pub metadata_json: Option<String>,
}

/// Per-user dashboard counters.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStats {
    pub total_projects: i64,
    pub docx_count: i64,
    pub pptx_count: i64,
    pub generated_sections: i64,
    pub total_refinements: i64,
    pub total_feedback: i64,
}

/// JSON body for POST /projects.
#[derive(Debug, Deserialize)]
pub struct ProjectCreateRequest {
    pub title: String,
    pub document_type: String,
    pub main_topic: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub sections: Vec<SectionCreateRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SectionCreateRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub order: i64,
}
