use crate::output::{print_json, print_table};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use testdash_core::config::DiscoveryConfig;
use testdash_core::discovery::discover_and_store;
use testdash_core::paths;
use testdash_core::store::FileStore;

/// Scan `dirs` (or the base dir) and overwrite the registry file.
pub fn run(
    root: &Path,
    dirs: Vec<PathBuf>,
    registry: Option<PathBuf>,
    patterns: &[String],
    json: bool,
) -> Result<()> {
    let roots: Vec<PathBuf> = if dirs.is_empty() {
        vec![root.to_path_buf()]
    } else {
        dirs.into_iter().map(|d| root.join(d)).collect()
    };
    let registry_path = registry
        .map(|p| root.join(p))
        .unwrap_or_else(|| paths::registry_path(root));

    let mut config = DiscoveryConfig::new(roots);
    if !patterns.is_empty() {
        config = config.with_patterns(patterns)?;
    }

    let store = FileStore::new(registry_path);
    let report = discover_and_store(&config, &store)
        .with_context(|| format!("failed to write {}", store.path().display()))?;

    for err in &report.errors {
        eprintln!("warning: {}: {}", err.root.display(), err.message);
    }

    if json {
        #[derive(serde::Serialize)]
        struct DiscoverOutput<'a> {
            registry: &'a Path,
            tests: usize,
            categories: usize,
            errors: Vec<String>,
        }

        return print_json(&DiscoverOutput {
            registry: store.path(),
            tests: report.registry.total(),
            categories: report.registry.category_count(),
            errors: report
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.root.display(), e.message))
                .collect(),
        });
    }

    let rows: Vec<Vec<String>> = report
        .registry
        .categories
        .iter()
        .map(|(category, entries)| vec![category.clone(), entries.len().to_string()])
        .collect();
    if !rows.is_empty() {
        print_table(&["CATEGORY", "TESTS"], &rows);
        println!();
    }
    println!(
        "Found {} test files in {} categories → {}",
        report.registry.total(),
        report.registry.category_count(),
        store.path().display()
    );
    Ok(())
}
