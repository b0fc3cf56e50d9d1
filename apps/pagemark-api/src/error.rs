//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use pagemark_sync::SyncError;

/// Error returned by a handler.
///
/// A run either succeeds completely or fails as a whole; there is no
/// partial-success response shape. Failures render as a single JSON error
/// object.
#[derive(Debug)]
pub struct ApiError(SyncError);

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SyncError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            SyncError::Source(_) | SyncError::Mirror(_) => StatusCode::BAD_GATEWAY,
        };
        error!(error = %self.0, "Run failed");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
