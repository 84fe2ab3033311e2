//! MCP server implementation
//!
//! Registers the `run_shell_command` tool and serializes executor results
//! back to the caller as JSON.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use crate::executor;
use crate::params::RunShellCommandParams;

/// The shell MCP server
///
/// Stateless between calls; each invocation owns its own child process and
/// buffers, so the server is safe to clone and call concurrently.
#[derive(Clone)]
pub struct ShellMcpServer {
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ShellMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Execute a shell command on the host system and return its captured \
                       stdout, stderr, exit code, and timeout state"
    )]
    async fn run_shell_command(
        &self,
        Parameters(params): Parameters<RunShellCommandParams>,
    ) -> Result<CallToolResult, McpError> {
        let result =
            executor::run(&params.command, params.timeout, params.cwd.as_deref()).await;

        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for ShellMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Shell execution MCP server. run_shell_command runs an arbitrary command \
                 through the host shell (pipes and redirection work) and reports stdout, \
                 stderr, exit code, and timeout state. Non-zero exit codes are reported \
                 verbatim, not raised as errors."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for ShellMcpServer {
    fn default() -> Self {
        Self::new()
    }
}
