use axum::extract::State;
use axum::Json;
use testdash_core::project::ProjectStatus;

use crate::error::{join_error, AppError};
use crate::state::AppState;

/// GET /api/claude-status: presence of CLAUDE.md and claude_tasks/ in the base dir.
pub async fn claude_status(State(app): State<AppState>) -> Result<Json<ProjectStatus>, AppError> {
    let base = app.config.base_dir.clone();
    let status = tokio::task::spawn_blocking(move || ProjectStatus::detect(&base))
        .await
        .map_err(join_error)?;
    Ok(Json(status))
}
