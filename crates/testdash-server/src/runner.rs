//! Execute one test file under its interpreter with a wall-clock limit.
//!
//! Every outcome, including spawn failures and timeouts, is a [`RunOutcome`];
//! nothing here is an HTTP-level error.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use testdash_core::interpreter::{ExecutionPlan, Interpreter};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(500);

const MANUAL_MESSAGE: &str =
    "Browser-based test page: open this file in a browser to run it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Executed,
    Manual,
    Unsupported,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    #[serde(rename = "type")]
    pub kind: RunKind,
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub working_dir: PathBuf,
    pub full_path: PathBuf,
    pub duration_ms: u64,
}

impl RunOutcome {
    fn new(kind: RunKind, full_path: &Path, working_dir: &Path) -> Self {
        Self {
            kind,
            success: false,
            output: String::new(),
            error: None,
            exit_code: None,
            timed_out: false,
            working_dir: working_dir.to_path_buf(),
            full_path: full_path.to_path_buf(),
            duration_ms: 0,
        }
    }

    fn failed(kind: RunKind, full_path: &Path, working_dir: &Path, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(kind, full_path, working_dir)
        }
    }
}

/// Run `full_path` from `working_dir`, killing the process after `timeout`.
pub async fn run_test(full_path: &Path, working_dir: &Path, timeout: Duration) -> RunOutcome {
    if !full_path.is_file() {
        return RunOutcome::failed(
            RunKind::Executed,
            full_path,
            working_dir,
            format!("file not found: {}", full_path.display()),
        );
    }

    match ExecutionPlan::for_path(full_path) {
        ExecutionPlan::Run(interpreter) => {
            execute(interpreter, full_path, working_dir, timeout).await
        }
        ExecutionPlan::Manual => RunOutcome {
            success: true,
            output: MANUAL_MESSAGE.to_string(),
            ..RunOutcome::new(RunKind::Manual, full_path, working_dir)
        },
        ExecutionPlan::Unsupported(ext) => {
            let what = if ext.is_empty() {
                "files without an extension".to_string()
            } else {
                format!("'.{ext}' files")
            };
            RunOutcome::failed(
                RunKind::Unsupported,
                full_path,
                working_dir,
                format!("no interpreter configured for {what}"),
            )
        }
    }
}

async fn execute(
    interpreter: Interpreter,
    full_path: &Path,
    working_dir: &Path,
    timeout: Duration,
) -> RunOutcome {
    let (program, args) = interpreter.command(full_path);
    let installed = tokio::task::spawn_blocking(move || which::which(program).is_ok())
        .await
        .unwrap_or(false);
    if !installed {
        return RunOutcome::failed(
            RunKind::Executed,
            full_path,
            working_dir,
            format!("{} is not installed or not on PATH", interpreter.name()),
        );
    }

    let start = Instant::now();
    let child = Command::new(program)
        .args(&args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let mut child = match child {
        Ok(c) => c,
        Err(e) => {
            return RunOutcome::failed(
                RunKind::Executed,
                full_path,
                working_dir,
                format!("failed to spawn '{program}': {e}"),
            );
        }
    };

    let stdout = Capture::start(child.stdout.take());
    let stderr = Capture::start(child.stderr.take());

    let waited = tokio::time::timeout(timeout, child.wait()).await;
    if waited.is_err() {
        if let Err(e) = child.kill().await {
            warn!(path = %full_path.display(), error = %e, "failed to kill timed-out test");
        }
    }
    let stdout = stdout.finish().await;
    let stderr = stderr.finish().await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let mut outcome = RunOutcome {
        duration_ms,
        output: stdout,
        ..RunOutcome::new(RunKind::Executed, full_path, working_dir)
    };

    match waited {
        Ok(Ok(status)) => {
            outcome.success = status.success();
            outcome.exit_code = status.code();
            outcome.error = if !stderr.is_empty() {
                Some(stderr)
            } else if !outcome.success {
                Some(match status.code() {
                    Some(code) => format!("exited with status {code}"),
                    None => "terminated by signal".to_string(),
                })
            } else {
                None
            };
            info!(
                path = %full_path.display(),
                success = outcome.success,
                duration_ms,
                "test finished"
            );
        }
        Ok(Err(e)) => {
            outcome.error = Some(with_stderr(format!("wait failed: {e}"), &stderr));
        }
        Err(_) => {
            warn!(path = %full_path.display(), ?timeout, "test timed out");
            outcome.timed_out = true;
            outcome.error = Some(with_stderr(
                format!("timed out after {}", format_limit(timeout)),
                &stderr,
            ));
        }
    }

    outcome
}

fn with_stderr(message: String, stderr: &str) -> String {
    if stderr.is_empty() {
        message
    } else {
        format!("{message}\n{stderr}")
    }
}

fn format_limit(limit: Duration) -> String {
    if limit.subsec_millis() == 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{}ms", limit.as_millis())
    }
}

/// Pipe reader that appends into a shared buffer as bytes arrive, so a
/// run killed on timeout still reports what it printed.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl Capture {
    fn start<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let task = pipe.map(|mut pipe| {
            let sink = buf.clone();
            tokio::spawn(async move {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => sink.lock().await.extend_from_slice(&chunk[..n]),
                    }
                }
            })
        });
        Self { buf, task }
    }

    /// Wait briefly for EOF, then take whatever was read. Grandchildren
    /// can hold the pipe open after the test process is gone.
    async fn finish(self) -> String {
        if let Some(task) = self.task {
            let abort = task.abort_handle();
            if tokio::time::timeout(PIPE_DRAIN_GRACE, task).await.is_err() {
                abort.abort();
            }
        }
        let bytes = self.buf.lock().await;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    const LIMIT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn passing_script_reports_success_and_output() {
        let dir = TempDir::new().unwrap();
        let file = script(&dir, "ok_test.sh", "echo hello-from-test\n");

        let outcome = run_test(&file, dir.path(), LIMIT).await;

        assert_eq!(outcome.kind, RunKind::Executed);
        assert!(outcome.success, "unexpected failure: {:?}", outcome.error);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.output.trim(), "hello-from-test");
        assert!(outcome.error.is_none());
        assert_eq!(outcome.full_path, file);
    }

    #[tokio::test]
    async fn failing_script_captures_stderr_and_exit_code() {
        let dir = TempDir::new().unwrap();
        let file = script(&dir, "bad_test.sh", "echo out\necho broken >&2\nexit 3\n");

        let outcome = run_test(&file, dir.path(), LIMIT).await;

        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.output.trim(), "out");
        assert_eq!(outcome.error.as_deref().map(str::trim), Some("broken"));
    }

    #[tokio::test]
    async fn silent_failure_still_has_error_text() {
        let dir = TempDir::new().unwrap();
        let file = script(&dir, "quiet_test.sh", "exit 1\n");

        let outcome = run_test(&file, dir.path(), LIMIT).await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("exited with status 1"));
    }

    #[tokio::test]
    async fn runs_from_working_dir() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("tests");
        std::fs::create_dir_all(&sub).unwrap();
        let file = sub.join("pwd_test.sh");
        std::fs::write(&file, "pwd\n").unwrap();

        let outcome = run_test(&file, dir.path(), LIMIT).await;

        let printed = PathBuf::from(outcome.output.trim());
        assert_eq!(
            printed.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert_eq!(outcome.working_dir, dir.path());
    }

    #[tokio::test]
    async fn slow_script_times_out() {
        let dir = TempDir::new().unwrap();
        let file = script(
            &dir,
            "slow_test.sh",
            "echo before-sleep\necho still-setting-up >&2\nsleep 5\n",
        );

        let outcome = run_test(&file, dir.path(), Duration::from_millis(300)).await;

        assert!(!outcome.success);
        assert!(outcome.timed_out);
        assert!(outcome.duration_ms < 5000);
        assert_eq!(outcome.output.trim(), "before-sleep");
        let error = outcome.error.unwrap();
        assert!(error.starts_with("timed out after 300ms"), "{error}");
        assert!(error.contains("still-setting-up"));
    }

    #[tokio::test]
    async fn html_is_manual_and_not_spawned() {
        let dir = TempDir::new().unwrap();
        let file = script(&dir, "test-page.html", "<html></html>");

        let outcome = run_test(&file, dir.path(), LIMIT).await;

        assert_eq!(outcome.kind, RunKind::Manual);
        assert!(outcome.success);
        assert!(outcome.exit_code.is_none());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "manual");
    }

    #[tokio::test]
    async fn unknown_extension_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let file = script(&dir, "widget.test.lua", "");

        let outcome = run_test(&file, dir.path(), LIMIT).await;

        assert_eq!(outcome.kind, RunKind::Unsupported);
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("'.lua'"));
    }

    #[tokio::test]
    async fn missing_file_is_a_structured_failure() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("gone.test.js");

        let outcome = run_test(&file, dir.path(), LIMIT).await;

        assert_eq!(outcome.kind, RunKind::Executed);
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("file not found"));
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let outcome = RunOutcome::failed(
            RunKind::Executed,
            Path::new("/p/a.test.js"),
            Path::new("/p"),
            "boom".into(),
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "executed");
        assert_eq!(json["fullPath"], "/p/a.test.js");
        assert_eq!(json["workingDir"], "/p");
        assert_eq!(json["timedOut"], false);
        assert!(json.get("exitCode").is_none());
    }
}
