use actix_session::Session;

use crate::errors::AppError;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_email(session: &Session) -> Option<String> {
    session.get::<String>("email").unwrap_or(None)
}

/// Store the authenticated user in the session, replacing any prior login.
pub fn log_in(session: &Session, user_id: i64, email: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert("user_id", user_id)
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert("email", email)
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(())
}

/// Current user id; Err(Unauthorized) when no session exists.
pub fn require_user(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or(AppError::Unauthorized)
}
