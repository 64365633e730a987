use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::auth::validate;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::project::{self, DocumentType, NewProject, ProjectCreateRequest};
use crate::models::section::{self, NewSection};
use crate::models::{feedback, refinement};

/// GET /projects - The current user's projects with section counts.
pub async fn list(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let conn = pool.get()?;
    let projects = project::find_all_for_user(&conn, user_id)?;
    Ok(HttpResponse::Ok().json(projects))
}

/// POST /projects - Create a project and its initial sections in one call.
pub async fn create(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<ProjectCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;

    if DocumentType::parse(&body.document_type).is_none() {
        return Err(AppError::Validation(
            "Document type must be 'docx' or 'pptx'".to_string(),
        ));
    }
    if let Some(msg) = validate::validate_required(&body.title, "Title", 200) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_required(&body.main_topic, "Main topic", 500) {
        return Err(AppError::Validation(msg));
    }

    let conn = pool.get()?;
    let metadata_json = body
        .metadata
        .as_ref()
        .map(|m| serde_json::to_string(m))
        .transpose()
        .map_err(|e| AppError::Validation(format!("Invalid metadata: {e}")))?;

    let project_id = project::create(
        &conn,
        &NewProject {
            user_id,
            title: body.title.clone(),
            document_type: body.document_type.clone(),
            main_topic: body.main_topic.clone(),
            metadata_json,
        },
    )?;

    for s in &body.sections {
        section::create(
            &conn,
            &NewSection {
                project_id,
                title: s.title.clone(),
                description: s.description.clone().unwrap_or_default(),
                ord: s.order,
            },
        )?;
    }

    let created = project::find_owned(&conn, project_id, user_id)?.ok_or(AppError::NotFound)?;
    let sections = section::find_ordered(&conn, project_id)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": created.id,
        "title": created.title,
        "document_type": created.document_type,
        "main_topic": created.main_topic,
        "metadata_json": created.metadata_json,
        "created_at": created.created_at,
        "updated_at": created.updated_at,
        "sections": sections,
    })))
}

/// GET /projects/{id} - Full project view: sections with their refinement
/// and feedback history.
pub async fn read(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();
    let conn = pool.get()?;

    let project = project::find_owned(&conn, project_id, user_id)?.ok_or(AppError::NotFound)?;
    let sections = section::find_ordered(&conn, project_id)?;

    let mut section_views = Vec::with_capacity(sections.len());
    for s in sections {
        let refinements = refinement::find_for_section(&conn, s.id)?;
        let feedbacks = feedback::find_for_section(&conn, s.id)?;
        section_views.push(serde_json::json!({
            "id": s.id,
            "title": s.title,
            "description": s.description,
            "content": s.content,
            "order": s.ord,
            "refinements": refinements,
            "feedbacks": feedbacks,
        }));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": project.id,
        "title": project.title,
        "document_type": project.document_type,
        "main_topic": project.main_topic,
        "metadata_json": project.metadata_json,
        "created_at": project.created_at,
        "updated_at": project.updated_at,
        "sections": section_views,
    })))
}

/// DELETE /projects/{id} - Cascades to sections, refinements, feedback.
pub async fn delete(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();
    let conn = pool.get()?;

    project::find_owned(&conn, project_id, user_id)?.ok_or(AppError::NotFound)?;
    project::delete(&conn, project_id)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Project deleted successfully"
    })))
}

/// GET /stats - Dashboard counters for the current user.
pub async fn stats(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let conn = pool.get()?;
    let stats = project::stats_for_user(&conn, user_id)?;
    Ok(HttpResponse::Ok().json(stats))
}
