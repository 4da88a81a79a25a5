use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use testdash_core::DashError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit status codes
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 404 through the `anyhow::Error` chain.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct NotFoundError(String);

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Rendered as `{ "error": "..." }`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<NotFoundError>().is_some() {
            return StatusCode::NOT_FOUND;
        }
        match self.0.downcast_ref::<DashError>() {
            Some(DashError::MissingParameter(_) | DashError::InvalidPattern { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Some(DashError::FileNotFound(_)) => StatusCode::NOT_FOUND,
            Some(DashError::PathOutsideRoots(_)) => StatusCode::FORBIDDEN,
            Some(DashError::Io(_) | DashError::Json(_)) | None => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Map a `spawn_blocking` join failure into a 500.
pub(crate) fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError(anyhow::anyhow!("task join error: {e}"))
}
