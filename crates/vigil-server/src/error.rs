//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use vigil_core::ClassifyError;

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `image` part in the multipart request.
    #[error("no image uploaded")]
    MissingImage,

    /// The uploaded part carried no filename.
    #[error("no file selected")]
    NoFileSelected,

    /// The filename extension is not an accepted image type.
    #[error("file type not allowed: {0}; upload an image file (png, jpg, jpeg, gif)")]
    FileTypeNotAllowed(String),

    /// The multipart body could not be read.
    #[error("malformed upload: {0}")]
    Upload(String),

    /// Classification failed.
    #[error("error processing image: {0}")]
    Classify(#[from] ClassifyError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::MissingImage => (StatusCode::BAD_REQUEST, "missing_image"),
            ApiError::NoFileSelected => (StatusCode::BAD_REQUEST, "no_file_selected"),
            ApiError::FileTypeNotAllowed(_) => (StatusCode::BAD_REQUEST, "file_type_not_allowed"),
            ApiError::Upload(_) => (StatusCode::BAD_REQUEST, "bad_upload"),
            ApiError::Classify(ClassifyError::Detector(_)) => {
                (StatusCode::BAD_GATEWAY, "detector_error")
            }
            ApiError::Classify(ClassifyError::Serialization(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
