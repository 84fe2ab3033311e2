//! Shell MCP library
//!
//! MCP server exposing a single tool, `run_shell_command`, that executes an
//! arbitrary shell command on the host and returns its captured output, exit
//! status, and timeout/error state as a structured record.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use shell_mcp::ShellMcpServer;
//!
//! let server = ShellMcpServer::new();
//! // Serve via stdio or mount in an HTTP router
//! ```
//!
//! The executor can also be called directly:
//!
//! ```rust,ignore
//! let result = shell_mcp::executor::run("echo hello", None, None).await;
//! assert_eq!(result.returncode, Some(0));
//! ```

pub mod config;
pub mod executor;
pub mod init;
pub mod params;
pub mod server;
pub mod types;

// Re-export the main entry points
pub use config::{Config, TransportKind};
pub use server::ShellMcpServer;
pub use types::ExecutionResult;
