use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldMessage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i64),

    /// Field-level failures from the validation gate (or a store
    /// unique violation remapped to the same shape on insert).
    #[error("Validation failed")]
    Validation(Vec<FieldMessage>),

    /// Email taken by another user during update.
    #[error("Email '{0}' already in use")]
    EmailConflict(String),

    /// A referenced role id does not exist; the whole insert is rolled
    /// back.
    #[error("Role not found: {0}")]
    UnknownRole(i64),

    #[error("User {0} could not be deleted")]
    DeleteConflict(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::Validation(messages) => AppError::FieldValidation(messages),
            UserError::EmailConflict(email) => {
                AppError::Conflict(format!("Email '{}' already in use", email))
            }
            UserError::UnknownRole(id) => {
                AppError::UnprocessableEntity(format!("Role {} does not exist", id))
            }
            UserError::DeleteConflict(id) => {
                AppError::Conflict(format!("User {} could not be deleted", id))
            }
            UserError::InvalidInput(msg) => AppError::BadRequest(msg),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                AppError::InternalServerError("An internal error occurred".to_string())
            }
            UserError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
