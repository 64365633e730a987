use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::require_user;
use crate::errors::AppError;
use crate::models::project::DocumentType;
use crate::themes::ThemeStore;

#[derive(Debug, Deserialize)]
pub struct ThemeQuery {
    #[serde(default)]
    pub document_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub theme_name: String,
    #[serde(default)]
    pub document_type: Option<String>,
}

fn parse_doc_type(raw: Option<&str>) -> Result<DocumentType, AppError> {
    match raw {
        None => Ok(DocumentType::Pptx),
        Some(s) => DocumentType::parse(s)
            .ok_or_else(|| AppError::Validation("Invalid document type".to_string())),
    }
}

/// GET /themes?document_type=pptx - Built-in and custom themes.
pub async fn list(
    store: web::Data<ThemeStore>,
    session: Session,
    query: web::Query<ThemeQuery>,
) -> Result<HttpResponse, AppError> {
    require_user(&session)?;
    let doc_type = parse_doc_type(query.document_type.as_deref())?;
    let themes = store.available(doc_type);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "themes": themes,
        "document_type": doc_type.as_str(),
    })))
}

/// POST /themes/upload?theme_name=...&document_type=... - Store a custom
/// template. The body is the raw template file, so this route lives
/// outside the JSON content-type guard.
pub async fn upload(
    store: web::Data<ThemeStore>,
    session: Session,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    require_user(&session)?;
    let doc_type = parse_doc_type(query.document_type.as_deref())?;
    if body.is_empty() {
        return Err(AppError::Validation("Template file is empty".to_string()));
    }

    let theme_id = store.save_custom(&query.theme_name, doc_type, &body)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Theme uploaded successfully",
        "theme_name": theme_id,
    })))
}

/// DELETE /themes/{id}?document_type=... - Remove a custom theme.
/// Built-ins cannot be deleted and report not-found.
pub async fn delete(
    store: web::Data<ThemeStore>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<ThemeQuery>,
) -> Result<HttpResponse, AppError> {
    require_user(&session)?;
    let doc_type = parse_doc_type(query.document_type.as_deref())?;

    if store.delete_custom(&path.into_inner(), doc_type)? {
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Theme deleted successfully"
        })))
    } else {
        Err(AppError::NotFound)
    }
}
