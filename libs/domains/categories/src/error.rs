use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(i64),

    #[error("Category {0} is still referenced by products")]
    InUse(i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<CategoryError> for AppError {
    fn from(error: CategoryError) -> Self {
        match error {
            CategoryError::NotFound(id) => AppError::NotFound(format!("Category {} not found", id)),
            CategoryError::InUse(id) => AppError::Conflict(format!(
                "Category {} cannot be deleted while products reference it",
                id
            )),
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
