use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;

use super::types::MessageResponse;
use super::validation::FieldError;

pub const OWNER_NOT_FOUND: &str = "User Not found";
pub const CONTACT_NOT_FOUND: &str = "Contact Not found";
pub const SERVER_ERROR: &str = "Server Error";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Pool(String),
    #[error("Database query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Store lock poisoned")]
    Poisoned,
    #[error("Owner email already registered: {0}")]
    DuplicateEmail(String),
    #[error("Contact email already registered for owner: {0}")]
    DuplicateContact(String),
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContactListError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("User Not found")]
    OwnerNotFound,
    #[error("Contact Not found")]
    ContactNotFound,
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ContactListError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            Self::MalformedBody(reason) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": [FieldError::body(reason)] })),
            )
                .into_response(),
            Self::OwnerNotFound => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(OWNER_NOT_FOUND)),
            )
                .into_response(),
            Self::ContactNotFound => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(CONTACT_NOT_FOUND)),
            )
                .into_response(),
            Self::Store(e) => {
                error!("Contact list store failure: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        assert_eq!(ContactListError::OwnerNotFound.to_string(), "User Not found");
        assert_eq!(
            ContactListError::ContactNotFound.to_string(),
            "Contact Not found"
        );
    }

    #[test]
    fn test_status_codes() {
        let validation = ContactListError::Validation(vec![FieldError::body("bad")]);
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ContactListError::OwnerNotFound.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ContactListError::Store(StoreError::Poisoned)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ContactListError = StoreError::Pool("timed out".to_string()).into();
        assert!(matches!(err, ContactListError::Store(StoreError::Pool(_))));
        assert_eq!(err.to_string(), "Database connection failed: timed out");
    }
}
