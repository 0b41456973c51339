use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::TrackerError;

pub const NOT_FOUND_BODY: &str = "Assignment not found";
pub const ROUTE_NOT_FOUND_BODY: &str = "Route not found";
pub const INTERNAL_ERROR_BODY: &str = "Something went wrong!";

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error returned by request handlers.
#[derive(Debug)]
pub enum ApiError {
    Tracker(TrackerError),
    /// A request body that could not be read or decoded. Answered like any
    /// other internal failure; the detail only reaches the log.
    MalformedBody(String),
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        ApiError::Tracker(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Tracker(err @ TrackerError::Validation(_)) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response(),
            ApiError::Tracker(TrackerError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
            }
            ApiError::MalformedBody(detail) => {
                tracing::warn!(error = %detail, "Unreadable request body");
                internal_error_response()
            }
            ApiError::Tracker(err) => {
                tracing::error!(error = %err, "Request failed");
                internal_error_response()
            }
        }
    }
}

pub fn internal_error_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}
