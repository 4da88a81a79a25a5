use crate::error::{DashError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File and directory constants
// ---------------------------------------------------------------------------

pub const REGISTRY_FILE: &str = "test-registry.json";
pub const CLAUDE_MD: &str = "CLAUDE.md";
pub const CLAUDE_MD_BACKUP: &str = "CLAUDE.md.backup";
pub const CLAUDE_TASKS_DIR: &str = "claude_tasks";
pub const CLAUDE_TASKS_ACTIVE_DIR: &str = "claude_tasks/active";
pub const CLAUDE_TASKS_FINISHED_DIR: &str = "claude_tasks/finished";
pub const QUICK_REFERENCE_FILE: &str = "claude_tasks/QUICK_REFERENCE.md";
pub const PRINCIPLES_FILE: &str = "claude_tasks/PRINCIPLES_QUICK_CARD.md";
pub const ACTIVE_TASKS_FILE: &str = "claude_tasks/active/ACTIVE_TASKS.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn registry_path(base: &Path) -> PathBuf {
    base.join(REGISTRY_FILE)
}

pub fn claude_md_path(base: &Path) -> PathBuf {
    base.join(CLAUDE_MD)
}

pub fn claude_tasks_dir(base: &Path) -> PathBuf {
    base.join(CLAUDE_TASKS_DIR)
}

// ---------------------------------------------------------------------------
// Test path resolution
// ---------------------------------------------------------------------------

/// Where a requested test path landed and which directory to run it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub full_path: PathBuf,
    pub working_dir: PathBuf,
    pub exists: bool,
}

/// Resolve a user-supplied test path.
///
/// Tries the path as given when absolute, then `cwd/requested`, then
/// `root/requested` for each alternate root. The first existing candidate
/// wins. When nothing exists the path is taken relative to `cwd`, so the
/// caller reports a plain not-found for it.
pub fn resolve_test_path(
    requested: &str,
    cwd: &Path,
    alternate_roots: &[PathBuf],
) -> ResolvedPath {
    let requested_path = Path::new(requested);

    if requested_path.is_absolute() {
        if requested_path.exists() {
            return ResolvedPath {
                full_path: requested_path.to_path_buf(),
                working_dir: containing_root(requested_path, cwd, alternate_roots),
                exists: true,
            };
        }
    } else {
        let bases = std::iter::once(cwd).chain(alternate_roots.iter().map(PathBuf::as_path));
        for base in bases {
            let candidate = base.join(requested_path);
            if candidate.exists() {
                return ResolvedPath {
                    full_path: candidate,
                    working_dir: base.to_path_buf(),
                    exists: true,
                };
            }
        }
    }

    ResolvedPath {
        full_path: cwd.join(requested_path),
        working_dir: cwd.to_path_buf(),
        exists: false,
    }
}

/// Most specific configured root containing `path`, else the file's parent.
fn containing_root(path: &Path, cwd: &Path, alternate_roots: &[PathBuf]) -> PathBuf {
    std::iter::once(cwd)
        .chain(alternate_roots.iter().map(PathBuf::as_path))
        .filter(|root| path.starts_with(root))
        .max_by_key(|root| root.components().count())
        .map(Path::to_path_buf)
        .or_else(|| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| cwd.to_path_buf())
}

/// Reject an existing path that resolves outside every allowed root.
///
/// Symlinks and `..` are resolved before comparing. A path that does not
/// exist passes through so callers can report it as not found.
pub fn ensure_within_roots(path: &Path, allowed: &[PathBuf]) -> Result<()> {
    let Ok(canonical) = path.canonicalize() else {
        return Ok(());
    };
    let inside = allowed
        .iter()
        .filter_map(|root| root.canonicalize().ok())
        .any(|root| canonical.starts_with(root));
    if inside {
        Ok(())
    } else {
        Err(DashError::PathOutsideRoots(path.display().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
