//! MCP Server entry point for network time.
//!
//! Serves the `get-time` tool over stdio. The time server can be overridden
//! with `NTP_SERVER`, `NTP_PORT` and `NTP_TIMEOUT_SECS`.

mod server;

use std::process::ExitCode;

use opendata_toolbox::NtpConfig;
use rmcp::ServiceExt;
use server::NtpMcp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing to stderr (MCP uses stdout for protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = NtpConfig::from_env();
    tracing::info!("Time server {}:{}", config.server, config.port);

    let service = match NtpMcp::new(config).serve(rmcp::transport::stdio()).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Fatal error in main(): {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("NTP MCP Server running on stdio");

    if let Err(e) = service.waiting().await {
        tracing::error!("MCP server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
