//! Parameter types for shell MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RunShellCommandParams {
    #[schemars(description = "The shell command to execute")]
    pub command: String,

    #[schemars(description = "Timeout in seconds (optional, unbounded if not provided)")]
    #[serde(default)]
    pub timeout: Option<f64>,

    #[schemars(
        description = "Working directory (optional, defaults to the server's current directory)"
    )]
    #[serde(default)]
    pub cwd: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_alone_is_sufficient() {
        let params: RunShellCommandParams =
            serde_json::from_str(r#"{"command": "echo hello"}"#).unwrap();

        assert_eq!(params.command, "echo hello");
        assert!(params.timeout.is_none());
        assert!(params.cwd.is_none());
    }

    #[test]
    fn test_fractional_timeout_accepted() {
        let params: RunShellCommandParams =
            serde_json::from_str(r#"{"command": "sleep 5", "timeout": 0.1, "cwd": "/tmp"}"#)
                .unwrap();

        assert_eq!(params.timeout, Some(0.1));
        assert_eq!(params.cwd.as_deref(), Some("/tmp"));
    }

    #[test]
    fn test_missing_command_is_rejected() {
        let result = serde_json::from_str::<RunShellCommandParams>(r#"{"timeout": 1.0}"#);
        assert!(result.is_err());
    }
}
