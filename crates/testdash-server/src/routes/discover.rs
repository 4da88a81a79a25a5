use axum::extract::State;
use axum::Json;
use testdash_core::discovery::{discover_and_store, DiscoveryReport};

use crate::error::{join_error, AppError};
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct DiscoverBody {
    #[serde(default)]
    pub directories: Option<Vec<String>>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    #[serde(default)]
    pub project_dirs: Option<Vec<String>>,
}

/// POST /api/discover-tests: rescan and overwrite the registry.
///
/// `directories`, when non-empty, replaces the default roots for this run.
/// Returns 403 if any of them lies outside the base dir and project dirs.
/// Per-root scan errors come back in `error`; they do not fail the request.
pub async fn discover_tests(
    State(app): State<AppState>,
    body: Option<Json<DiscoverBody>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let directories = body.and_then(|Json(b)| b.directories);
    let report = rediscover(&app, directories).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Test discovery completed",
        "output": report.summary(),
        "error": report.error_text(),
    })))
}

/// POST /api/refresh: same as discover-tests, keyed by `projectDirs`.
pub async fn refresh(
    State(app): State<AppState>,
    body: Option<Json<RefreshBody>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project_dirs = body.and_then(|Json(b)| b.project_dirs);
    let report = rediscover(&app, project_dirs).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!(
            "Registry refreshed: {} tests in {} categories",
            report.registry.total(),
            report.registry.category_count()
        ),
    })))
}

async fn rediscover(
    app: &AppState,
    directories: Option<Vec<String>>,
) -> Result<DiscoveryReport, AppError> {
    let app = app.clone();
    let report = tokio::task::spawn_blocking(move || {
        let roots = app.discovery_roots(directories)?;
        discover_and_store(&app.config.discovery_config(roots), app.store.as_ref())
    })
    .await
    .map_err(join_error)??;

    tracing::info!(
        tests = report.registry.total(),
        categories = report.registry.category_count(),
        errors = report.errors.len(),
        "registry rebuilt"
    );
    Ok(report)
}
