use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i64),

    /// A referenced category id does not exist; the whole write is
    /// rolled back.
    #[error("Category not found: {0}")]
    UnknownCategory(i64),

    #[error("Product {0} could not be deleted")]
    DeleteConflict(i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::UnknownCategory(id) => {
                AppError::UnprocessableEntity(format!("Category {} does not exist", id))
            }
            ProductError::DeleteConflict(id) => {
                AppError::Conflict(format!("Product {} could not be deleted", id))
            }
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
