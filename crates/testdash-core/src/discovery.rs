//! Filesystem walk that turns one or more project roots into a [`Registry`].

use crate::config::{DiscoveryConfig, MAX_DEPTH};
use crate::error::Result;
use crate::registry::{category_for, Registry, TestEntry};
use crate::store::RegistryStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// A root whose scan stopped early. Other roots are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootError {
    pub root: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub registry: Registry,
    pub roots: Vec<PathBuf>,
    pub errors: Vec<RootError>,
}

impl DiscoveryReport {
    /// Human-readable log of the run, one line per root plus a total.
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self
            .roots
            .iter()
            .map(|r| format!("Scanning {}", r.display()))
            .collect();
        for err in &self.errors {
            lines.push(format!("Error scanning {}: {}", err.root.display(), err.message));
        }
        lines.push(format!(
            "Found {} test files in {} categories",
            self.registry.total(),
            self.registry.category_count()
        ));
        lines.join("\n")
    }

    /// Per-root errors joined into one message, or None when every root succeeded.
    pub fn error_text(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| format!("{}: {}", e.root.display(), e.message))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// Scan every root in `config` and build a sorted registry.
///
/// Never fails as a whole: a root that cannot be walked is recorded in
/// [`DiscoveryReport::errors`] and the remaining roots are still scanned.
pub fn discover(config: &DiscoveryConfig) -> DiscoveryReport {
    let roots = unique_roots(&config.effective_roots());
    let labels = (roots.len() > 1).then(|| root_labels(&roots));

    let mut registry = Registry::new();
    let mut errors = Vec::new();
    // Canonical paths already registered; nested roots see the same files.
    let mut claimed = HashSet::new();

    for (i, root) in roots.iter().enumerate() {
        let label = labels.as_ref().map(|l| l[i].as_str());
        let project_root = labels.is_some().then(|| root.clone());
        let scanned = scan_root(config, root, label, project_root, &mut claimed, &mut registry);
        match scanned {
            Ok(found) => info!(root = %root.display(), found, "scanned root"),
            Err(err) => {
                warn!(root = %root.display(), error = %err, "root scan failed");
                errors.push(RootError {
                    root: root.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    registry.sort();
    DiscoveryReport {
        registry,
        roots,
        errors,
    }
}

/// Run [`discover`] and persist the result through `store` in a single write.
pub fn discover_and_store(
    config: &DiscoveryConfig,
    store: &dyn RegistryStore,
) -> Result<DiscoveryReport> {
    let report = discover(config);
    store.write(&report.registry.to_json()?)?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

fn scan_root(
    config: &DiscoveryConfig,
    root: &Path,
    label: Option<&str>,
    project_root: Option<PathBuf>,
    claimed: &mut HashSet<PathBuf>,
    registry: &mut Registry,
) -> std::result::Result<usize, walkdir::Error> {
    let walker = WalkDir::new(root)
        .max_depth(MAX_DEPTH + 1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_pruned(config, e));

    let mut found = 0;
    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) if is_permission_denied(&err) => {
                debug!(path = ?err.path(), "permission denied, skipping");
                continue;
            }
            Err(err) => return Err(err),
        };

        if !is_regular_file(&entry) {
            continue;
        }
        let file = entry.file_name().to_string_lossy().into_owned();
        if !config.is_test_file(&file) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let canonical = entry
            .path()
            .canonicalize()
            .unwrap_or_else(|_| entry.path().to_path_buf());
        if !claimed.insert(canonical) {
            debug!(path = %entry.path().display(), "already registered by an earlier root");
            continue;
        }
        let segments: Vec<String> = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        let category = category_for(
            segments.as_slice(),
            |s| config.is_test_dir_token(s),
            label,
        );
        let directory = if segments.is_empty() {
            ".".to_string()
        } else {
            segments.join("/")
        };
        let relative_path = if segments.is_empty() {
            file.clone()
        } else {
            format!("{directory}/{file}")
        };

        registry.insert(
            category,
            TestEntry {
                file,
                relative_path,
                directory,
                full_path: entry.path().to_path_buf(),
                project_root: project_root.clone(),
            },
        );
        found += 1;
    }

    Ok(found)
}

/// Hidden and skip-listed entries are cut before the walker descends into them.
fn is_pruned(config: &DiscoveryConfig, entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || config.is_skipped_dir(&name)
}

fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn is_permission_denied(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
}

// ---------------------------------------------------------------------------
// Roots
// ---------------------------------------------------------------------------

/// Make roots absolute and drop any that name an already-listed directory.
fn unique_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for root in roots {
        let absolute = std::path::absolute(root).unwrap_or_else(|_| root.clone());
        let key = absolute.canonicalize().unwrap_or_else(|_| absolute.clone());
        if seen.insert(key) {
            out.push(absolute);
        } else {
            debug!(root = %root.display(), "duplicate root ignored");
        }
    }
    out
}

/// Base name of each root; repeated names get `-2`, `-3`, ... suffixes.
fn root_labels(roots: &[PathBuf]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    roots
        .iter()
        .map(|root| {
            let base = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| root.display().to_string());
            let mut label = base.clone();
            let mut n = 2;
            while !used.insert(label.clone()) {
                label = format!("{base}-{n}");
                n += 1;
            }
            label
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
