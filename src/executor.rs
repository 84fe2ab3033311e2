//! Command executor
//!
//! Runs one shell command to completion or timeout and reports a complete,
//! structured outcome. Every fault class is absorbed into the result record;
//! nothing propagates to the caller.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::types::ExecutionResult;

/// How long after a timeout kill to keep collecting buffered output before
/// abandoning the pipes. Covers descendants that escaped the process group
/// and still hold the write ends open.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Execute a shell command and report its outcome.
///
/// The command string is handed to `sh -c`, so pipes, redirection, and
/// chaining all work. `timeout` is in seconds; `None` means unbounded.
/// `cwd` defaults to the server's current working directory when absent.
///
/// This function never fails: spawn errors, invalid working directories,
/// and timeouts all come back as an [`ExecutionResult`] whose `error` and
/// `timeout` fields say what happened. A non-zero exit code is a normal,
/// completed run.
pub async fn run(command: &str, timeout: Option<f64>, cwd: Option<&str>) -> ExecutionResult {
    debug!(command, ?timeout, ?cwd, "executing shell command");

    match execute(command, timeout, cwd).await {
        Ok(result) => result,
        Err(e) => ExecutionResult::exec_error(e),
    }
}

async fn execute(
    command: &str,
    timeout: Option<f64>,
    cwd: Option<&str>,
) -> std::io::Result<ExecutionResult> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    // Lead a fresh process group so a timeout can take down everything the
    // shell spawned, not just the shell itself.
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn()?;

    // Drain both pipes concurrently so a full pipe buffer can't deadlock the
    // child, and so partial output survives a timeout kill.
    let stdout_task = tokio::spawn(drain(child.stdout.take()));
    let stderr_task = tokio::spawn(drain(child.stderr.take()));

    let status = match timeout.map(as_duration) {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_elapsed) => {
                kill_group(&mut child).await?;
                let stdout = drain_remainder(stdout_task).await;
                let stderr = drain_remainder(stderr_task).await;
                return Ok(ExecutionResult::timed_out(stdout, stderr, command));
            }
        },
        None => child.wait().await?,
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    Ok(ExecutionResult::completed(stdout, stderr, status.code()))
}

/// Kill the timed-out command tree and reap the shell.
///
/// Killing only the shell leaves its forked children running, and they hold
/// the pipe write ends open; signalling the whole group stops them too and
/// closes the pipes promptly.
async fn kill_group(child: &mut Child) -> std::io::Result<()> {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        let _ = unsafe { libc::kill(-(pid as i32), libc::SIGKILL) };
    }
    child.kill().await
}

/// Collect what a reader task buffered before the kill. Bounded so the call
/// still returns within timeout-plus-grace if some descendant escaped the
/// process group and keeps its pipe end open.
async fn drain_remainder(mut task: JoinHandle<String>) -> String {
    match tokio::time::timeout(DRAIN_GRACE, &mut task).await {
        Ok(joined) => joined.unwrap_or_default(),
        Err(_elapsed) => {
            task.abort();
            String::new()
        }
    }
}

/// Negative and NaN timeouts behave as an immediate timeout rather than a
/// panic; finite values too large for a `Duration` wait unbounded, matching
/// the underlying primitive.
fn as_duration(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(limit) => limit,
        Err(_) if secs > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_captures_stdout() {
        let result = run("echo hello", None, None).await;

        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "");
        assert_eq!(result.returncode, Some(0));
        assert!(!result.timeout);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_stderr_captured_independently() {
        let result = run("echo oops >&2", None, None).await;

        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "oops\n");
        assert_eq!(result.returncode, Some(0));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let result = run("exit 3", None, None).await;

        assert_eq!(result.returncode, Some(3));
        assert!(!result.timeout);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_shell_features_work() {
        let result = run("echo one && echo two | tr a-z A-Z", None, None).await;

        assert_eq!(result.stdout, "one\nTWO\n");
        assert_eq!(result.returncode, Some(0));
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let started = std::time::Instant::now();
        let result = run("sleep 5", Some(0.1), None).await;

        assert!(result.timeout);
        assert_eq!(result.returncode, None);
        assert_eq!(result.error.as_deref(), Some("Command timeout: sleep 5"));
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "");
        // Well under the command's natural 5s runtime
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_timed_out_child_is_not_left_running() {
        let marker = std::env::temp_dir().join(format!(
            "shell_mcp_timeout_marker_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&marker);

        let command = format!("sleep 1 && touch {}", marker.display());
        let started = std::time::Instant::now();
        let result = run(&command, Some(0.2), None).await;

        assert!(result.timeout);
        assert!(started.elapsed() < Duration::from_secs(1));

        // The forked `sleep` would let `touch` run at the 1s mark if it had
        // survived the group kill
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_timeout_bounds_call_despite_descendants() {
        // The shell forks `sleep` as a child here; only a group kill closes
        // its pipe ends, so this also guards against the call blocking for
        // the command's natural runtime.
        let started = std::time::Instant::now();
        let result = run("sleep 5 && echo done", Some(0.1), None).await;

        assert!(result.timeout);
        assert_eq!(result.stdout, "");
        assert_eq!(result.returncode, None);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_as_duration_clamps_degenerate_values() {
        assert_eq!(as_duration(0.5), Duration::from_millis(500));
        assert_eq!(as_duration(-1.0), Duration::ZERO);
        assert_eq!(as_duration(f64::NAN), Duration::ZERO);
        assert_eq!(as_duration(f64::MAX), Duration::MAX);
        assert_eq!(as_duration(f64::INFINITY), Duration::MAX);
    }

    #[tokio::test]
    async fn test_partial_output_survives_timeout() {
        let result = run("echo early; sleep 5", Some(0.5), None).await;

        assert!(result.timeout);
        assert_eq!(result.stdout, "early\n");
        assert_eq!(result.returncode, None);
    }

    #[tokio::test]
    async fn test_negative_timeout_is_immediate_timeout() {
        let result = run("sleep 5", Some(-1.0), None).await;

        assert!(result.timeout);
        assert_eq!(result.returncode, None);
    }

    #[tokio::test]
    async fn test_invalid_cwd_is_execution_error() {
        let result = run("echo hi", None, Some("/nonexistent_dir_xyz")).await;

        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "");
        assert_eq!(result.returncode, None);
        assert!(!result.timeout);
        let error = result.error.expect("error should be set");
        assert!(error.starts_with("Execution error: "));
    }

    #[tokio::test]
    async fn test_error_shape_is_idempotent() {
        let first = run("echo hi", None, Some("/nonexistent_dir_xyz")).await;
        let second = run("echo hi", None, Some("/nonexistent_dir_xyz")).await;

        assert_eq!(first.returncode, second.returncode);
        assert_eq!(first.timeout, second.timeout);
        assert_eq!(first.error.is_some(), second.error.is_some());
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported_by_the_shell() {
        // The shell itself spawns fine; it reports the missing binary via
        // exit code 127 and a diagnostic on stderr.
        let result = run("nonexistent_binary_xyz", None, None).await;

        assert_eq!(result.returncode, Some(127));
        assert!(!result.stderr.is_empty());
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_cwd_is_respected() {
        let result = run("pwd", None, Some("/tmp")).await;

        assert_eq!(result.returncode, Some(0));
        assert!(result.stdout.trim_end().ends_with("/tmp"));
    }

    #[tokio::test]
    async fn test_empty_output_for_silent_command() {
        let result = run("true", None, None).await;

        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "");
        assert_eq!(result.returncode, Some(0));
    }
}
