use crate::error::Result;
use crate::io::{atomic_write, ensure_dir, ensure_gitignore_entry, write_if_missing};
use crate::{paths, templates};
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Presence of the task-management scaffolding in a project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectStatus {
    pub initialized: bool,
    #[serde(rename = "hasCLAUDE_md")]
    pub has_claude_md: bool,
    pub has_claude_tasks: bool,
}

impl ProjectStatus {
    pub fn detect(base: &Path) -> Self {
        let has_claude_md = paths::claude_md_path(base).is_file();
        let has_claude_tasks = paths::claude_tasks_dir(base).is_dir();
        Self {
            initialized: has_claude_md && has_claude_tasks,
            has_claude_md,
            has_claude_tasks,
        }
    }
}

// ---------------------------------------------------------------------------
// Scaffold
// ---------------------------------------------------------------------------

/// Knobs for [`scaffold`].
#[derive(Debug, Clone, Copy)]
pub struct ScaffoldOptions {
    /// Rewrite starter files and add the task-system reference to an existing CLAUDE.md.
    pub force: bool,
    /// Add `.gitignore` entries for the registry and the CLAUDE.md backup.
    pub gitignore: bool,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            force: false,
            gitignore: true,
        }
    }
}

/// Paths touched by [`scaffold`], relative to the base dir.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScaffoldReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
}

/// Install the task-management scaffolding into `base`:
/// `claude_tasks/{active,finished}`, the starter documents, `CLAUDE.md`
/// and (optionally) `.gitignore` entries.
///
/// Existing files are left alone unless `force` is set. Even then an existing
/// CLAUDE.md is never replaced: the task-system reference is prepended and
/// the original is kept as `CLAUDE.md.backup`.
pub fn scaffold(base: &Path, options: ScaffoldOptions) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for rel in [paths::CLAUDE_TASKS_ACTIVE_DIR, paths::CLAUDE_TASKS_FINISHED_DIR] {
        let dir = base.join(rel);
        if dir.is_dir() {
            report.skipped.push(rel.to_string());
        } else {
            ensure_dir(&dir)?;
            report.created.push(rel.to_string());
        }
    }

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let active_tasks = templates::ACTIVE_TASKS.replace(templates::DATE_PLACEHOLDER, &today);
    let starters = [
        (paths::QUICK_REFERENCE_FILE, templates::QUICK_REFERENCE),
        (paths::PRINCIPLES_FILE, templates::PRINCIPLES_QUICK_CARD),
        (paths::ACTIVE_TASKS_FILE, active_tasks.as_str()),
    ];
    for (rel, content) in starters {
        let path = base.join(rel);
        if !path.exists() {
            atomic_write(&path, content.as_bytes())?;
            report.created.push(rel.to_string());
        } else if options.force {
            atomic_write(&path, content.as_bytes())?;
            report.updated.push(rel.to_string());
        } else {
            report.skipped.push(rel.to_string());
        }
    }

    let claude_md = paths::claude_md_path(base);
    if write_if_missing(&claude_md, templates::CLAUDE_MD.as_bytes())? {
        report.created.push(paths::CLAUDE_MD.to_string());
    } else if options.force && add_task_reference(base)? {
        report.created.push(paths::CLAUDE_MD_BACKUP.to_string());
        report.updated.push(paths::CLAUDE_MD.to_string());
    } else {
        report.skipped.push(paths::CLAUDE_MD.to_string());
    }

    if options.gitignore {
        for entry in [paths::REGISTRY_FILE, paths::CLAUDE_MD_BACKUP] {
            if ensure_gitignore_entry(base, entry)? {
                report.updated.push(format!(".gitignore: {entry}"));
            }
        }
    }

    Ok(report)
}

/// Prepend the task-system reference to an existing CLAUDE.md, backing up
/// the original first. No-op when the file already mentions `claude_tasks`.
fn add_task_reference(base: &Path) -> Result<bool> {
    let claude_md = paths::claude_md_path(base);
    let existing = std::fs::read_to_string(&claude_md)?;
    if existing.contains(paths::CLAUDE_TASKS_DIR) {
        return Ok(false);
    }

    atomic_write(&base.join(paths::CLAUDE_MD_BACKUP), existing.as_bytes())?;
    let body = match existing.strip_prefix("# CLAUDE.md") {
        Some(rest) => rest.split_once('\n').map_or("", |(_, tail)| tail),
        None => existing.as_str(),
    };
    let merged = format!("{}{body}", templates::CLAUDE_MD_REFERENCE);
    atomic_write(&claude_md, merged.as_bytes())?;
    Ok(true)
}
