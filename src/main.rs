//! Shell MCP - host shell command execution server
//!
//! Exposes `run_shell_command` over stdio or a streamable-HTTP listener,
//! selected by configuration.

use anyhow::Result;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use rmcp::ServiceExt;

use shell_mcp::config::{Config, TransportKind};
use shell_mcp::init::init_tracing;
use shell_mcp::server::ShellMcpServer;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("shell_mcp")?;

    let config = Config::load();
    tracing::info!(transport = ?config.transport, "Starting shell-mcp server");

    match config.transport {
        TransportKind::Stdio => serve_stdio().await,
        TransportKind::Network => serve_network(config).await,
    }
}

async fn serve_stdio() -> Result<()> {
    let server = ShellMcpServer::new();
    let service = server.serve(rmcp::transport::stdio()).await?;

    tracing::info!("Server running on stdio, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}

async fn serve_network(config: Config) -> Result<()> {
    let service = StreamableHttpService::new(
        || Ok(ShellMcpServer::new()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let app = axum::Router::new().nest_service("/mcp", service);

    let addr = config.bind_addr();
    tracing::info!("Server listening on http://{}/mcp", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
