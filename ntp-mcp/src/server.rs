//! MCP Server implementation for network time.
//!
//! Exposes the single `get-time` tool.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::fmt::Display;
use std::sync::Arc;

use opendata_toolbox::{NetworkTime, NtpConfig, ToolboxError, ToolboxResult, ToolboxService};

#[async_trait]
pub(crate) trait NtpGateway: Send + Sync {
    async fn network_time(&self) -> ToolboxResult<NetworkTime>;
}

struct DefaultNtpGateway {
    config: NtpConfig,
}

#[async_trait]
impl NtpGateway for DefaultNtpGateway {
    async fn network_time(&self) -> ToolboxResult<NetworkTime> {
        ToolboxService::network_time(&self.config).await
    }
}

fn map_toolbox_error(error: &ToolboxError) -> McpError {
    tracing::error!("Error querying network time: {error}");
    McpError::internal_error(format!("Time query failed: {error}"), None)
}

/// Render `time` in `tz` as `Fri Oct 16 2026 14:03:07 GMT+0200`.
pub(crate) fn format_date<Tz>(time: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.with_timezone(tz)
        .format("%a %b %d %Y %H:%M:%S GMT%z")
        .to_string()
}

/// MCP Server for network time.
#[derive(Clone)]
pub struct NtpMcp {
    gateway: Arc<dyn NtpGateway>,
    tool_router: ToolRouter<Self>,
}

impl NtpMcp {
    /// Create a server querying the time server in `config`.
    #[must_use]
    pub fn new(config: NtpConfig) -> Self {
        Self::with_gateway(Arc::new(DefaultNtpGateway { config }))
    }

    pub(crate) fn with_gateway(gateway: Arc<dyn NtpGateway>) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl NtpMcp {
    /// Current date from the PTB time service.
    #[tool(
        name = "get-time",
        description = "Frage Datum und Zeit bei der Physikalisch-Technischen Bundesanstalt ab."
    )]
    async fn get_time(&self) -> Result<CallToolResult, McpError> {
        let network_time = self
            .gateway
            .network_time()
            .await
            .map_err(|e| map_toolbox_error(&e))?;

        tracing::debug!(
            "{} answered with offset {}ms",
            network_time.server,
            network_time.offset_ms
        );

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Aktuelles Datum: {}",
            format_date(network_time.time, &Local)
        ))]))
    }
}

#[tool_handler]
impl ServerHandler for NtpMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "NTP MCP Server - get-time liefert das aktuelle Datum und die Uhrzeit \
                 vom Zeitserver der Physikalisch-Technischen Bundesanstalt."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "test_mocks.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
pub(crate) mod test_mocks;

#[cfg(test)]
#[path = "server_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests;

#[cfg(test)]
#[path = "client_integration_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]
mod client_integration_tests;
