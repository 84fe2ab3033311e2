//! Tracing initialization
//!
//! Logs go to stderr because stdout carries the MCP protocol on the stdio
//! transport. `RUST_LOG` controls filtering, defaulting this crate to `info`;
//! `LOG_FORMAT=json` switches to structured output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(format!("{crate_name}=info").parse()?);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(stderr.json()).init();
    } else {
        registry.with(stderr.with_ansi(false)).init();
    }

    Ok(())
}
