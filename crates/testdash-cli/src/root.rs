use std::path::{Path, PathBuf};

/// Resolve the dashboard base directory.
///
/// Priority:
/// 1. `--root` flag / `TESTDASH_ROOT` env var (passed in as `explicit`),
///    made absolute against the cwd
/// 2. the cwd
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd,
    }
}
