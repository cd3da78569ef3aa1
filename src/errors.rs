use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tracing::error;

/// Business rule violations raised by the repository layer
///
/// These travel inside `anyhow::Error` and are recovered by downcasting when
/// the error reaches the HTTP boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Item is already booked for these dates ({} conflicting booking(s))", .conflicting_ids.len())]
    BookingOverlap { conflicting_ids: Vec<String> },
    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(anyhow::Error),
    #[error("Not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Missing X-Tenant-Id header")]
    MissingTenant,
    #[error("Unknown tenant")]
    UnknownTenant,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(_) => ApiError::NotFound,
            DomainError::Invalid(msg) => ApiError::Validation(msg),
            other @ (DomainError::BookingOverlap { .. }
            | DomainError::InvalidTransition { .. }
            | DomainError::Conflict(_)) => ApiError::Conflict(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(domain) = err.downcast_ref::<DomainError>() {
            return domain.clone().into();
        }
        match err.downcast_ref::<DieselError>() {
            Some(DieselError::NotFound) => ApiError::NotFound,
            Some(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                ApiError::Conflict("Record is still referenced by other records".to_string())
            }
            Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                ApiError::Conflict("Record already exists".to_string())
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                error!("Unhandled repository error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::MissingTenant => (StatusCode::BAD_REQUEST, "Missing X-Tenant-Id header".to_string()),
            ApiError::UnknownTenant => (StatusCode::UNAUTHORIZED, "Unknown tenant".to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
