use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use testdash_core::discovery::discover_and_store;
use tracing::info;

use crate::error::{join_error, AppError};
use crate::state::AppState;

/// GET /api/test-registry: the persisted registry document, verbatim.
///
/// When no registry exists yet, discovery runs synchronously over the
/// default roots and its result is written before being returned. An
/// existing document is never rescanned here; use `/api/refresh` for that.
pub async fn get_registry(State(app): State<AppState>) -> Result<Response, AppError> {
    let store = app.store.clone();
    let config = app.config.clone();
    let document = tokio::task::spawn_blocking(move || {
        if !store.exists() {
            info!("no test registry yet, running discovery");
            let discovery = config.discovery_config(config.default_roots());
            discover_and_store(&discovery, store.as_ref())?;
        }
        store.read()
    })
    .await
    .map_err(join_error)??;

    Ok(([(header::CONTENT_TYPE, "application/json")], document).into_response())
}
