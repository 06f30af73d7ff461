use crate::models::DateKey;
use axum::http::StatusCode;
use thiserror::Error;

/// Reasons a store mutation was not applied. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("text must not be empty")]
    EmptyText,

    #[error("no item at index {index}")]
    OutOfRange { index: usize },

    #[error("{0} is in the past and can no longer be edited")]
    PastDate(DateKey),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode records: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PastDate(_) => Self::forbidden(err.to_string()),
            StoreError::EmptyText | StoreError::OutOfRange { .. } => {
                Self::bad_request(err.to_string())
            }
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
