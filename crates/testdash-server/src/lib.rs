pub mod embed;
pub mod error;
pub mod routes;
pub mod runner;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use testdash_core::store::RegistryStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, ServiceConfig, DEFAULT_RUN_TIMEOUT};

/// Build the axum Router backed by the registry file in `config`.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(config: ServiceConfig) -> Router {
    router(AppState::new(config))
}

/// Build the Router over a caller-supplied registry store.
pub fn build_router_with_store(config: ServiceConfig, store: Arc<dyn RegistryStore>) -> Router {
    router(AppState::with_store(config, store))
}

fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/test-registry", get(routes::registry::get_registry))
        .route("/api/test-content", get(routes::content::get_test_content))
        .route("/api/run-test", post(routes::run::run_test))
        .route(
            "/api/discover-tests",
            post(routes::discover::discover_tests),
        )
        .route("/api/refresh", post(routes::discover::refresh))
        .route("/api/claude-status", get(routes::status::claude_status))
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the dashboard server on a pre-bound listener.
///
/// Accepting a bound `TcpListener` lets the caller read the actual port
/// first (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(
    config: ServiceConfig,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(
        base = %config.base_dir.display(),
        registry = %config.registry_path.display(),
        "test dashboard listening on http://localhost:{actual_port}"
    );
    let app = build_router(config);

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
