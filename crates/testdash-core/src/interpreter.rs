//! Extension-to-interpreter dispatch for running a single test file.
//!
//! The table is closed: an extension either maps to a known interpreter,
//! is marked for manual (browser) execution, or is reported unsupported.

use std::path::Path;

/// Interpreters a test file can be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpreter {
    Node,
    Tsx,
    Python,
    Ruby,
    Bash,
    Php,
    GoTest,
}

impl Interpreter {
    /// Executable looked up on PATH.
    pub fn program(&self) -> &'static str {
        match self {
            Interpreter::Node => "node",
            Interpreter::Tsx => "npx",
            Interpreter::Python => "python3",
            Interpreter::Ruby => "ruby",
            Interpreter::Bash => "bash",
            Interpreter::Php => "php",
            Interpreter::GoTest => "go",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interpreter::Node => "node",
            Interpreter::Tsx => "node (via npx tsx)",
            Interpreter::Python => "python3",
            Interpreter::Ruby => "ruby",
            Interpreter::Bash => "bash",
            Interpreter::Php => "php",
            Interpreter::GoTest => "go test",
        }
    }

    /// Arguments that precede the test file path.
    fn leading_args(&self) -> &'static [&'static str] {
        match self {
            Interpreter::Tsx => &["--yes", "tsx"],
            Interpreter::GoTest => &["test"],
            _ => &[],
        }
    }

    /// Full argv for running `file`: `(program, args)`.
    pub fn command(&self, file: &Path) -> (&'static str, Vec<String>) {
        let mut args: Vec<String> = self.leading_args().iter().map(|a| a.to_string()).collect();
        args.push(file.to_string_lossy().into_owned());
        (self.program(), args)
    }
}

/// What to do with a given test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    Run(Interpreter),
    /// Browser-only test pages; never spawned.
    Manual,
    /// No interpreter mapping for this extension (empty when there is none).
    Unsupported(String),
}

impl ExecutionPlan {
    pub fn for_extension(ext: &str) -> Self {
        match ext {
            "js" | "mjs" | "cjs" => ExecutionPlan::Run(Interpreter::Node),
            "ts" | "tsx" | "jsx" => ExecutionPlan::Run(Interpreter::Tsx),
            "py" => ExecutionPlan::Run(Interpreter::Python),
            "rb" => ExecutionPlan::Run(Interpreter::Ruby),
            "sh" => ExecutionPlan::Run(Interpreter::Bash),
            "php" => ExecutionPlan::Run(Interpreter::Php),
            "go" => ExecutionPlan::Run(Interpreter::GoTest),
            "html" | "htm" => ExecutionPlan::Manual,
            other => ExecutionPlan::Unsupported(other.to_string()),
        }
    }

    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Self::for_extension(&ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_extensions_map_to_interpreters() {
        assert_eq!(
            ExecutionPlan::for_path(Path::new("tests/a.test.js")),
            ExecutionPlan::Run(Interpreter::Node)
        );
        assert_eq!(
            ExecutionPlan::for_path(Path::new("tests/a.test.mjs")),
            ExecutionPlan::Run(Interpreter::Node)
        );
        assert_eq!(
            ExecutionPlan::for_path(Path::new("test_a.py")),
            ExecutionPlan::Run(Interpreter::Python)
        );
        assert_eq!(
            ExecutionPlan::for_path(Path::new("a.spec.ts")),
            ExecutionPlan::Run(Interpreter::Tsx)
        );
        assert_eq!(
            ExecutionPlan::for_path(Path::new("handler_test.go")),
            ExecutionPlan::Run(Interpreter::GoTest)
        );
    }

    #[test]
    fn every_discovered_extension_is_runnable_or_manual() {
        for ext in crate::config::DEFAULT_EXTENSIONS {
            assert!(
                !matches!(ExecutionPlan::for_extension(ext), ExecutionPlan::Unsupported(_)),
                "'.{ext}' is discovered but cannot be run"
            );
        }
        assert_eq!(
            ExecutionPlan::for_path(Path::new("Widget.test.tsx")),
            ExecutionPlan::Run(Interpreter::Tsx)
        );
        assert_eq!(
            ExecutionPlan::for_path(Path::new("Button.spec.jsx")),
            ExecutionPlan::Run(Interpreter::Tsx)
        );
    }

    #[test]
    fn html_is_manual() {
        assert_eq!(
            ExecutionPlan::for_path(Path::new("test-page.html")),
            ExecutionPlan::Manual
        );
        assert_eq!(
            ExecutionPlan::for_path(Path::new("LEGACY.TEST.HTM")),
            ExecutionPlan::Manual
        );
    }

    #[test]
    fn unknown_extensions_are_unsupported_not_defaulted() {
        assert_eq!(
            ExecutionPlan::for_path(Path::new("spec_helper.test.lua")),
            ExecutionPlan::Unsupported("lua".into())
        );
        assert_eq!(
            ExecutionPlan::for_path(Path::new("Makefile")),
            ExecutionPlan::Unsupported(String::new())
        );
    }

    #[test]
    fn command_places_file_after_leading_args() {
        let file = Path::new("/proj/tests/a.spec.ts");
        let (program, args) = Interpreter::Tsx.command(file);
        assert_eq!(program, "npx");
        assert_eq!(args, vec!["--yes", "tsx", "/proj/tests/a.spec.ts"]);

        let (program, args) = Interpreter::Python.command(Path::new("t.py"));
        assert_eq!(program, "python3");
        assert_eq!(args, vec!["t.py"]);
    }

    #[test]
    fn interpreter_names_are_stable() {
        assert_eq!(Interpreter::Tsx.name(), "node (via npx tsx)");
        assert_eq!(Interpreter::GoTest.name(), "go test");
    }
}
