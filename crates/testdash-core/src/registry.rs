//! The registry document: categories mapped to the test files found under them.
//!
//! The on-disk shape is a plain JSON object, one key per category:
//!
//! ```json
//! { "tests": [ { "file": "bar.spec.py", "relativePath": "tests/bar.spec.py",
//!               "directory": "tests", "fullPath": "/proj/tests/bar.spec.py" } ] }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Category for files sitting directly in a discovery root.
pub const ROOT_CATEGORY: &str = "root";

/// One discovered test file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEntry {
    pub file: String,
    pub relative_path: String,
    pub directory: String,
    pub full_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    pub categories: BTreeMap<String, Vec<TestEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: String, entry: TestEntry) {
        self.categories.entry(category).or_default().push(entry);
    }

    /// Sort every category by file name. `sort_by` is stable, so ties keep
    /// traversal order.
    pub fn sort(&mut self) {
        for entries in self.categories.values_mut() {
            entries.sort_by(|a, b| a.file.cmp(&b.file));
        }
    }

    pub fn get(&self, category: &str) -> Option<&[TestEntry]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of entries across all categories.
    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &TestEntry)> {
        self.categories
            .iter()
            .flat_map(|(cat, entries)| entries.iter().map(move |e| (cat.as_str(), e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

// ---------------------------------------------------------------------------
// Category derivation
// ---------------------------------------------------------------------------

/// Derive the category for a file from its root-relative directory segments.
///
/// Rules, first match wins:
/// 1. no segments: [`ROOT_CATEGORY`]
/// 2. a segment equal to a test-dir token: the segments up to and including it
/// 3. otherwise: the first two segments
///
/// `root_label` is set for multi-root runs and prefixes the result as `[label] `.
pub fn category_for<S: AsRef<str>>(
    segments: &[S],
    is_token: impl Fn(&str) -> bool,
    root_label: Option<&str>,
) -> String {
    let base = if segments.is_empty() {
        ROOT_CATEGORY.to_string()
    } else if let Some(pos) = segments.iter().position(|s| is_token(s.as_ref())) {
        join(&segments[..=pos])
    } else {
        join(&segments[..segments.len().min(2)])
    };

    match root_label {
        Some(label) => format!("[{label}] {base}"),
        None => base,
    }
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
