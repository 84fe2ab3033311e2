//! Type definitions for shell MCP

use serde::{Deserialize, Serialize};

/// Outcome of one shell command run.
///
/// Exactly one of three cases holds, and the field shape says which:
/// - completed: `returncode` is set, `timeout` is false, `error` is absent
///   (a non-zero exit code is still a completed run)
/// - timed out: `returncode` is null, `timeout` is true, `error` is set
/// - execution error: `returncode` is null, `timeout` is false, `error` is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Captured standard output, decoded as text
    pub stdout: String,
    /// Captured standard error, decoded as text
    pub stderr: String,
    /// Process exit code; null when the process never produced one
    pub returncode: Option<i32>,
    /// Whether the command was killed for exceeding its timeout
    pub timeout: bool,
    /// Human-readable error message on the timeout and error paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Normal completion, whatever the exit status was
    pub fn completed(stdout: String, stderr: String, returncode: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            returncode,
            timeout: false,
            error: None,
        }
    }

    /// Command exceeded its timeout and was killed; output is whatever the
    /// process produced before the kill
    pub fn timed_out(stdout: String, stderr: String, command: &str) -> Self {
        Self {
            stdout,
            stderr,
            returncode: None,
            timeout: true,
            error: Some(format!("Command timeout: {}", command)),
        }
    }

    /// The command could not be run at all
    pub fn exec_error(message: impl std::fmt::Display) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            returncode: None,
            timeout: false,
            error: Some(format!("Execution error: {}", message)),
        }
    }
}
