use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("database error: {0}")]
    Database(DbErr),
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotFound { .. } | Self::MalformedInput(_) => {
                StatusCode::BAD_REQUEST
            },
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                return Self::Validation(format!("duplicate value: {msg}"));
            },
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return Self::Validation(format!("unknown reference: {msg}"));
            },
            _ => {},
        }
        let text = err.to_string();
        if text.contains("CHECK constraint failed") {
            return Self::Validation(text);
        }
        Self::Database(err)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error rendered as a full HTML page.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into() }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self { status: err.status(), message: err.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        let body = crate::templates::error_page(&self.message);
        (self.status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_violation_is_validation() {
        let err = DbErr::Custom("CHECK constraint failed: rating >= 0 AND rating <= 10".into());
        assert!(matches!(CatalogError::from(err), CatalogError::Validation(_)));
    }

    #[test]
    fn other_db_errors_stay_database() {
        let err = DbErr::Custom("disk I/O error".into());
        let err = CatalogError::from(err);
        assert!(matches!(err, CatalogError::Database(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_rows_map_to_bad_request() {
        let err = CatalogError::NotFound { kind: "film", id: Uuid::nil() };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
