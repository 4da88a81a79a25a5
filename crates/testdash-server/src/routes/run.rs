use axum::extract::State;
use axum::Json;
use testdash_core::paths::resolve_test_path;
use testdash_core::DashError;

use crate::error::{join_error, AppError};
use crate::runner::{self, RunOutcome};
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct RunTestBody {
    #[serde(default)]
    pub path: Option<String>,
}

/// POST /api/run-test: resolve a test file and run it under its interpreter.
///
/// Test failures, timeouts, unsupported extensions and missing files are all
/// 200 responses carrying a `RunOutcome` with `success: false`.
///
/// Returns 400 if `path` is missing or blank.
/// Returns 403 if the file resolves outside the configured roots and is not
/// listed in the registry.
pub async fn run_test(
    State(app): State<AppState>,
    Json(body): Json<RunTestBody>,
) -> Result<Json<RunOutcome>, AppError> {
    let requested = body
        .path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| DashError::MissingParameter("path".into()))?;

    let gate = app.clone();
    let resolved = tokio::task::spawn_blocking(move || {
        let config = &gate.config;
        let resolved = resolve_test_path(&requested, &config.base_dir, &config.project_dirs);
        if resolved.exists {
            gate.check_path_allowed(&resolved.full_path)?;
        }
        Ok::<_, DashError>(resolved)
    })
    .await
    .map_err(join_error)??;

    tracing::info!(
        path = %resolved.full_path.display(),
        cwd = %resolved.working_dir.display(),
        "running test"
    );
    let outcome = runner::run_test(
        &resolved.full_path,
        &resolved.working_dir,
        app.config.run_timeout,
    )
    .await;

    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunKind;
    use crate::state::ServiceConfig;
    use axum::response::IntoResponse;

    fn app(dir: &tempfile::TempDir) -> AppState {
        AppState::new(ServiceConfig::new(dir.path().to_path_buf()))
    }

    #[tokio::test]
    async fn missing_path_is_400() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = run_test(State(app(&dir)), Json(RunTestBody { path: None }))
            .await
            .unwrap_err();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn unresolvable_path_is_structured_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let body = RunTestBody {
            path: Some("tests/missing.test.js".into()),
        };

        let Json(outcome) = run_test(State(app(&dir)), Json(body)).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.full_path, dir.path().join("tests/missing.test.js"));
        assert!(outcome.error.unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn html_page_is_manual() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("test-ui.html"), "<html></html>").unwrap();
        let body = RunTestBody {
            path: Some("test-ui.html".into()),
        };

        let Json(outcome) = run_test(State(app(&dir)), Json(body)).await.unwrap();

        assert_eq!(outcome.kind, RunKind::Manual);
    }

    #[tokio::test]
    async fn file_outside_roots_is_403() {
        let dir = tempfile::TempDir::new().unwrap();
        let other = tempfile::TempDir::new().unwrap();
        let file = other.path().join("evil_test.sh");
        std::fs::write(&file, "echo hi\n").unwrap();
        let body = RunTestBody {
            path: Some(file.to_string_lossy().into_owned()),
        };

        let err = run_test(State(app(&dir)), Json(body)).await.unwrap_err();

        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::FORBIDDEN
        );
    }
}
