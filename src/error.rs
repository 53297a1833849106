use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Message sent to clients when the store fails; details stay in the logs.
const STORE_FAILURE_MESSAGE: &str = "Something went wrong, please try again";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    NotAMember(String),
    #[error("{0}")]
    NotAuthorized(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("Authentication required")]
    Unauthenticated,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Every domain failure is a flat 400 carrying one message.
        let (status, message) = match &self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Store(detail) => {
                tracing::error!("Store error: {}", detail);
                (StatusCode::BAD_REQUEST, STORE_FAILURE_MESSAGE.to_string())
            }
            _ => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        (status, axum::Json(serde_json::json!({ "message": message }))).into_response()
    }
}
