use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::{log_in, require_user};
use crate::auth::{password, validate};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/register - Create an account and start a session.
pub async fn register(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    if let Some(msg) = validate::validate_email(&body.email) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_password(&body.password) {
        return Err(AppError::Validation(msg));
    }

    let conn = pool.get()?;
    if user::find_by_email(&conn, &body.email)?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let hashed = password::hash_password(&body.password)?;
    let user_id = user::create(&conn, &body.email, &hashed)?;

    log_in(&session, user_id, body.email.trim())?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Registered successfully",
        "user": { "id": user_id, "email": body.email.trim() }
    })))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;

    // Same error for unknown email and bad password.
    let user = user::find_by_email(&conn, &body.email)?.ok_or(AppError::Unauthorized)?;
    let ok = password::verify_password(&body.password, &user.password_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !ok {
        return Err(AppError::Unauthorized);
    }

    log_in(&session, user.id, &user.email)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Logged in successfully",
        "user": { "id": user.id, "email": user.email }
    })))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out" })))
}

/// GET /auth/me - The logged-in user's profile.
pub async fn me(pool: web::Data<DbPool>, session: Session) -> Result<HttpResponse, AppError> {
    let user_id = require_user(&session)?;
    let conn = pool.get()?;
    let user = user::find_by_id(&conn, user_id)?.ok_or(AppError::Unauthorized)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": user.id,
        "email": user.email,
        "created_at": user.created_at,
    })))
}
