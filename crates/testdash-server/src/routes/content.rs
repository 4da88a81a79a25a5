use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use testdash_core::paths::resolve_test_path;
use testdash_core::DashError;

use crate::error::{join_error, AppError};
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct ContentQuery {
    #[serde(default)]
    pub path: Option<String>,
}

/// GET /api/test-content?path=P: raw contents of a test file as text.
///
/// Returns 400 if `path` is missing or blank.
/// Returns 404 if the path does not resolve to a file.
/// Returns 403 if it resolves outside the configured roots.
pub async fn get_test_content(
    State(app): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<Response, AppError> {
    let requested = query
        .path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| DashError::MissingParameter("path".into()))?;

    let content = tokio::task::spawn_blocking(move || {
        let config = &app.config;
        let resolved = resolve_test_path(&requested, &config.base_dir, &config.project_dirs);
        if !resolved.full_path.is_file() {
            return Err(DashError::FileNotFound(requested));
        }
        app.check_path_allowed(&resolved.full_path)?;
        let bytes = std::fs::read(&resolved.full_path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    })
    .await
    .map_err(join_error)??;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content).into_response())
}
