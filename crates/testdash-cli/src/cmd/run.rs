use crate::output::print_json;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use testdash_core::paths::{ensure_within_roots, resolve_test_path};
use testdash_server::runner::{self, RunKind};
use testdash_server::DEFAULT_RUN_TIMEOUT;

/// Run one test file. Exits non-zero when the outcome is not a success.
pub fn run(root: &Path, path: &str, project_dirs: Vec<PathBuf>, json: bool) -> Result<()> {
    let resolved = resolve_test_path(path, root, &project_dirs);
    if resolved.exists {
        let allowed: Vec<PathBuf> = std::iter::once(root.to_path_buf())
            .chain(project_dirs.iter().cloned())
            .collect();
        ensure_within_roots(&resolved.full_path, &allowed)?;
    }

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(runner::run_test(
        &resolved.full_path,
        &resolved.working_dir,
        DEFAULT_RUN_TIMEOUT,
    ));

    if json {
        print_json(&outcome)?;
    } else {
        if !outcome.output.is_empty() {
            print!("{}", outcome.output);
        }
        if let Some(err) = &outcome.error {
            eprintln!("{err}");
        }
        if outcome.kind == RunKind::Manual {
            println!("{}", outcome.full_path.display());
        }
    }

    if outcome.success {
        Ok(())
    } else {
        Err(anyhow!("{} did not pass", outcome.full_path.display()))
    }
}
