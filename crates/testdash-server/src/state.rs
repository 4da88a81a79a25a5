use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use testdash_core::config::DiscoveryConfig;
use testdash_core::store::{FileStore, RegistryStore};
use testdash_core::{paths, DashError};

/// Wall-clock limit for a single test run.
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(30);

/// Static service configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory relative paths resolve against; also the default discovery root.
    pub base_dir: PathBuf,
    /// Alternate project roots (`PROJECT_DIRS`).
    pub project_dirs: Vec<PathBuf>,
    pub registry_path: PathBuf,
    pub run_timeout: Duration,
}

impl ServiceConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        let registry_path = paths::registry_path(&base_dir);
        Self {
            base_dir,
            project_dirs: Vec::new(),
            registry_path,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }

    pub fn with_project_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.project_dirs = dirs;
        self
    }

    pub fn with_registry_path(mut self, path: PathBuf) -> Self {
        self.registry_path = path;
        self
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Roots scanned when a request does not name its own.
    pub fn default_roots(&self) -> Vec<PathBuf> {
        if self.project_dirs.is_empty() {
            vec![self.base_dir.clone()]
        } else {
            self.project_dirs.clone()
        }
    }

    /// Request-supplied directories, relative ones taken against `base_dir`.
    /// An empty or absent list means the defaults.
    pub fn roots_for(&self, requested: Option<Vec<String>>) -> Vec<PathBuf> {
        let requested: Vec<PathBuf> = requested
            .unwrap_or_default()
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .map(|d| self.base_dir.join(d))
            .collect();
        if requested.is_empty() {
            self.default_roots()
        } else {
            requested
        }
    }

    pub fn discovery_config(&self, roots: Vec<PathBuf>) -> DiscoveryConfig {
        DiscoveryConfig::new(roots)
    }

    fn allowed_roots(&self) -> Vec<PathBuf> {
        std::iter::once(self.base_dir.clone())
            .chain(self.project_dirs.iter().cloned())
            .collect()
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub store: Arc<dyn RegistryStore>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        let store = Arc::new(FileStore::new(config.registry_path.clone()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: ServiceConfig, store: Arc<dyn RegistryStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Gate for reading or executing a resolved file: it must live under
    /// the base dir or one of the project dirs.
    pub fn check_path_allowed(&self, path: &Path) -> Result<(), DashError> {
        paths::ensure_within_roots(path, &self.config.allowed_roots())
    }

    /// Scan roots for a discovery request. Requested directories must
    /// stay inside the configured roots, otherwise a refresh could pull
    /// arbitrary files into the registry.
    pub fn discovery_roots(
        &self,
        requested: Option<Vec<String>>,
    ) -> Result<Vec<PathBuf>, DashError> {
        let roots = self.config.roots_for(requested);
        let allowed = self.config.allowed_roots();
        for root in &roots {
            paths::ensure_within_roots(root, &allowed)?;
        }
        Ok(roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testdash_core::store::MemoryStore;

    #[test]
    fn new_config_defaults_registry_under_base() {
        let config = ServiceConfig::new(PathBuf::from("/tmp/proj"));
        assert_eq!(
            config.registry_path,
            PathBuf::from("/tmp/proj/test-registry.json")
        );
        assert_eq!(config.run_timeout, Duration::from_secs(30));
        assert_eq!(config.default_roots(), vec![PathBuf::from("/tmp/proj")]);
    }

    #[test]
    fn project_dirs_replace_default_roots() {
        let config = ServiceConfig::new(PathBuf::from("/tmp/proj"))
            .with_project_dirs(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(
            config.default_roots(),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn requested_roots_resolve_against_base() {
        let config = ServiceConfig::new(PathBuf::from("/tmp/proj"));
        assert_eq!(
            config.roots_for(Some(vec!["web".into(), "/abs".into(), " ".into()])),
            vec![PathBuf::from("/tmp/proj/web"), PathBuf::from("/abs")]
        );
        assert_eq!(config.roots_for(Some(vec![])), config.default_roots());
        assert_eq!(config.roots_for(None), config.default_roots());
    }

    #[test]
    fn file_outside_roots_is_rejected_even_if_registered() {
        let base = tempfile::TempDir::new().unwrap();
        let elsewhere = tempfile::TempDir::new().unwrap();
        let file = elsewhere.path().join("x.test.js");
        std::fs::write(&file, "").unwrap();

        let doc = serde_json::json!({
            "[other] root": [{
                "file": "x.test.js",
                "relativePath": "x.test.js",
                "directory": ".",
                "fullPath": file,
            }]
        });
        let app = AppState::with_store(
            ServiceConfig::new(base.path().to_path_buf()),
            Arc::new(MemoryStore::with_document(doc.to_string())),
        );
        assert!(matches!(
            app.check_path_allowed(&file),
            Err(DashError::PathOutsideRoots(_))
        ));
        assert!(app.check_path_allowed(base.path()).is_ok());
    }

    #[test]
    fn discovery_roots_stay_inside_configured_roots() {
        let base = tempfile::TempDir::new().unwrap();
        let project = tempfile::TempDir::new().unwrap();
        let elsewhere = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(base.path().join("web")).unwrap();
        let app = AppState::with_store(
            ServiceConfig::new(base.path().to_path_buf())
                .with_project_dirs(vec![project.path().to_path_buf()]),
            Arc::new(MemoryStore::new()),
        );

        let roots = app
            .discovery_roots(Some(vec![
                "web".into(),
                project.path().display().to_string(),
            ]))
            .unwrap();
        assert_eq!(
            roots,
            vec![base.path().join("web"), project.path().to_path_buf()]
        );

        let outside = elsewhere.path().display().to_string();
        assert!(matches!(
            app.discovery_roots(Some(vec![outside])),
            Err(DashError::PathOutsideRoots(_))
        ));
        let escape = "../".repeat(8) + "etc";
        assert!(app.discovery_roots(Some(vec![escape])).is_err());
    }
}
