use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use testdash_server::ServiceConfig;

/// Start the dashboard and block until Ctrl-C.
pub fn run(
    root: &Path,
    port: u16,
    project_dirs: Vec<PathBuf>,
    registry: Option<PathBuf>,
    no_open: bool,
) -> Result<()> {
    let mut config = ServiceConfig::new(root.to_path_buf()).with_project_dirs(project_dirs);
    if let Some(path) = registry {
        config = config.with_registry_path(root.join(path));
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("Test dashboard → http://localhost:{actual_port}");

        tokio::select! {
            res = testdash_server::serve_on(config, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
