//! Failures that escape a route handler.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::json_message;

/// An error no handler formatted itself. Rendered by the dispatcher as
/// `{"message": ...}`.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DispatchError {
    /// The POST body could not be read, e.g. it exceeds the body limit.
    /// Keeps the rejection's status (413 for an oversized body).
    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),

    /// The POST body is not valid JSON. Always 500.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl DispatchError {
    fn status(&self) -> StatusCode {
        match self {
            DispatchError::Body(rejection) => rejection.status(),
            DispatchError::InvalidJson(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(error = %self, %status, "error processing request");
        json_message(status, &self.to_string())
    }
}
