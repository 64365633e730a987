use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::project::{self, DocumentType, Project};
use crate::models::section::{self, Section};
use crate::models::{feedback, refinement};
use crate::providers::TextProvider;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub section_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub section_id: i64,
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub section_id: i64,
    pub feedback_type: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub main_topic: String,
    pub document_type: String,
    #[serde(default)]
    pub num_sections: Option<usize>,
}

fn owned_project(
    conn: &rusqlite::Connection,
    project_id: i64,
    user_id: i64,
) -> Result<Project, AppError> {
    Ok(project::find_owned(conn, project_id, user_id)?.ok_or(AppError::NotFound)?)
}

fn project_section(
    conn: &rusqlite::Connection,
    project_id: i64,
    section_id: i64,
) -> Result<Section, AppError> {
    let section = section::find_by_id(conn, section_id)?.ok_or(AppError::NotFound)?;
    if section.project_id != project_id {
        return Err(AppError::NotFound);
    }
    Ok(section)
}

/// POST /projects/{id}/generate - Fill one section (or all of them) with
/// AI-generated body text. Overwrites prior content.
pub async fn generate(
    pool: web::Data<DbPool>,
    texts: web::Data<TextProvider>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    let (project, targets) = {
        let conn = pool.get()?;
        let project = owned_project(&conn, project_id, user_id)?;
        let targets = match body.section_id {
            Some(section_id) => vec![project_section(&conn, project_id, section_id)?],
            None => section::find_ordered(&conn, project_id)?,
        };
        (project, targets)
    };

    let doc_type = project.doc_type();
    let mut generated = Vec::with_capacity(targets.len());
    for target in &targets {
        // Slides are generated assuming an image will share the layout.
        let content = texts
            .generate_content(&target.title, &project.main_topic, doc_type, true)
            .await?;
        generated.push((target.id, content));
    }

    let conn = pool.get()?;
    for (section_id, content) in &generated {
        section::update_content(&conn, *section_id, content)?;
    }
    project::touch(&conn, project_id)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Content generated successfully",
        "sections_updated": generated.len(),
    })))
}

/// POST /projects/{id}/refine - Rework one section per a user prompt,
/// recording the before/after pair as refinement history.
pub async fn refine(
    pool: web::Data<DbPool>,
    texts: web::Data<TextProvider>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<RefineRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    let (project, section) = {
        let conn = pool.get()?;
        let project = owned_project(&conn, project_id, user_id)?;
        let section = project_section(&conn, project_id, body.section_id)?;
        (project, section)
    };

    let new_content = texts
        .refine_content(&section.content, &body.prompt, project.doc_type())
        .await?;

    let conn = pool.get()?;
    refinement::create(&conn, section.id, &body.prompt, &section.content, &new_content)?;
    section::update_content(&conn, section.id, &new_content)?;
    project::touch(&conn, project_id)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Content refined successfully",
        "new_content": new_content,
    })))
}

/// POST /projects/{id}/feedback
pub async fn submit_feedback(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    if !matches!(body.feedback_type.as_str(), "like" | "dislike") {
        return Err(AppError::Validation(
            "Feedback type must be 'like' or 'dislike'".to_string(),
        ));
    }

    let conn = pool.get()?;
    owned_project(&conn, project_id, user_id)?;
    let section = project_section(&conn, project_id, body.section_id)?;
    feedback::create(&conn, section.id, &body.feedback_type, &body.comment)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Feedback submitted successfully"
    })))
}

/// POST /ai/generate-template - Propose section titles for a topic.
/// Always answers with a usable outline, placeholders at worst.
pub async fn generate_template(
    texts: web::Data<TextProvider>,
    session: Session,
    body: web::Json<TemplateRequest>,
) -> Result<HttpResponse, AppError> {
    require_user(&session)?;

    let doc_type = DocumentType::parse(&body.document_type).ok_or_else(|| {
        AppError::Validation("Document type must be 'docx' or 'pptx'".to_string())
    })?;

    let sections = texts
        .generate_template(&body.main_topic, doc_type, body.num_sections)
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "sections": sections })))
}
