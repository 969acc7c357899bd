//! MCP Server entry point for the Marktstammdatenregister.
//!
//! Serves the `get-sums` tool over stdio. Endpoint and timeout can be
//! overridden with `MASTR_API_BASE` and `MASTR_TIMEOUT_SECS`.

mod schemas;
mod server;

use std::process::ExitCode;

use opendata_toolbox::MastrConfig;
use rmcp::ServiceExt;
use server::MastrMcp;
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

    let config = MastrConfig::from_env();
    tracing::info!(
        "MaStR endpoint {} (timeout {}s)",
        config.base_url,
        config.timeout.as_secs()
    );

    let mcp_server = MastrMcp::new(config);

    let service = match mcp_server.serve(rmcp::transport::stdio()).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Fatal error in main(): {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("MaStR MCP Server running on stdio");

    if let Err(e) = service.waiting().await {
        tracing::error!("MCP server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
