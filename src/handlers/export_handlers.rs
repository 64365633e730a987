use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::compose::assembler;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{project, section};
use crate::providers::ImageProvider;
use crate::themes::ThemeStore;

/// GET /projects/{id}/export - Assemble and download the artifact.
pub async fn export(
    pool: web::Data<DbPool>,
    themes: web::Data<ThemeStore>,
    images: web::Data<ImageProvider>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let project_id = path.into_inner();

    let (project, sections) = {
        let conn = pool.get()?;
        let project =
            project::find_owned(&conn, project_id, user_id)?.ok_or(AppError::NotFound)?;
        let sections = section::find_ordered(&conn, project_id)?;
        (project, sections)
    };

    let doc_type = project.doc_type();
    let bytes = assembler::assemble(&project, &sections, &themes, &images).await?;

    let filename = format!(
        "{}.{}",
        project.title.replace(['"', '\\', '\r', '\n'], "_"),
        doc_type.as_str()
    );
    Ok(HttpResponse::Ok()
        .content_type(doc_type.content_type())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes))
}
