use crate::error::{DashError, Result};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Deepest directory level scanned below a root (the root itself is level 0).
pub const MAX_DEPTH: usize = 10;

pub const DEFAULT_FILE_PATTERNS: &[&str] = &[
    r"\.(test|spec)\.[A-Za-z0-9]+$",
    r"^test[_-]",
    r"_test\.[A-Za-z0-9]+$",
];

pub const DEFAULT_TEST_DIR_TOKENS: &[&str] = &["test", "tests", "__tests__", "spec", "specs", "e2e"];

pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "coverage",
    "__pycache__",
    ".pytest_cache",
    "venv",
    ".venv",
    "env",
    "target",
    "vendor",
];

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "js", "mjs", "cjs", "jsx", "ts", "tsx", "py", "rb", "go", "sh", "php", "html",
];

static DEFAULT_PATTERN_SET: OnceLock<Vec<Regex>> = OnceLock::new();

fn default_patterns() -> &'static [Regex] {
    DEFAULT_PATTERN_SET.get_or_init(|| {
        DEFAULT_FILE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect()
    })
}

// ---------------------------------------------------------------------------
// DiscoveryConfig
// ---------------------------------------------------------------------------

/// Inputs for a single discovery run. Immutable once built.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub roots: Vec<PathBuf>,
    pub file_patterns: Vec<Regex>,
    pub test_dir_tokens: Vec<String>,
    pub skip_dirs: Vec<String>,
    pub extensions: Vec<String>,
}

impl DiscoveryConfig {
    /// Default rule sets over the given roots. An empty list scans the cwd.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            file_patterns: default_patterns().to_vec(),
            test_dir_tokens: to_strings(DEFAULT_TEST_DIR_TOKENS),
            skip_dirs: to_strings(DEFAULT_SKIP_DIRS),
            extensions: to_strings(DEFAULT_EXTENSIONS),
        }
    }

    /// Replace the filename rules. Fails on the first pattern that does not compile.
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let re = Regex::new(pattern).map_err(|e| DashError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            compiled.push(re);
        }
        self.file_patterns = compiled;
        Ok(self)
    }

    /// Roots to scan, with the cwd standing in for an empty list.
    pub fn effective_roots(&self) -> Vec<PathBuf> {
        if self.roots.is_empty() {
            vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
        } else {
            self.roots.clone()
        }
    }

    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }

    pub fn is_test_dir_token(&self, segment: &str) -> bool {
        self.test_dir_tokens.iter().any(|t| t == segment)
    }

    /// True when `file_name` has a recognized extension and matches a filename rule.
    pub fn is_test_file(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        if !self.extensions.iter().any(|e| e == ext) {
            return false;
        }
        self.file_patterns.iter().any(|re| re.is_match(file_name))
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Environment helpers
// ---------------------------------------------------------------------------

/// Split a colon-separated `PROJECT_DIRS` value. Empty segments are dropped.
pub fn parse_project_dirs(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_accept_common_test_names() {
        let config = DiscoveryConfig::default();
        for name in [
            "foo.test.js",
            "bar.spec.py",
            "Widget.test.tsx",
            "test_api.py",
            "test-login.html",
            "handler_test.go",
            "smoke_test.sh",
        ] {
            assert!(config.is_test_file(name), "expected test file: {name}");
        }
    }

    #[test]
    fn default_rules_reject_non_tests() {
        let config = DiscoveryConfig::default();
        for name in [
            "README.md",
            "index.js",
            "testing.md",
            "foo.test.md",
            "contest.py",
            "Makefile",
            "test_data.json",
        ] {
            assert!(!config.is_test_file(name), "expected non-test: {name}");
        }
    }

    #[test]
    fn custom_patterns_replace_defaults() {
        let config = DiscoveryConfig::default()
            .with_patterns(&[r"^check_.*\.py$"])
            .unwrap();
        assert!(config.is_test_file("check_db.py"));
        assert!(!config.is_test_file("test_db.py"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = DiscoveryConfig::default()
            .with_patterns(&["(unclosed"])
            .unwrap_err();
        assert!(matches!(err, DashError::InvalidPattern { .. }));
    }

    #[test]
    fn empty_roots_fall_back_to_cwd() {
        let config = DiscoveryConfig::default();
        let roots = config.effective_roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0], std::env::current_dir().unwrap());
    }

    #[test]
    fn parse_project_dirs_drops_empty_segments() {
        assert_eq!(
            parse_project_dirs("/a/one::/b/two: "),
            vec![PathBuf::from("/a/one"), PathBuf::from("/b/two")]
        );
        assert!(parse_project_dirs("").is_empty());
    }
}
