//! MCP Server implementation for MaStR power sums.
//!
//! Exposes the single `get-sums` tool.

use async_trait::async_trait;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

use opendata_toolbox::{
    MastrConfig, PowerSums, PowerSumsQuery, ToolboxError, ToolboxResult, ToolboxService,
};

use crate::schemas::GetSumsParams;

#[async_trait]
pub(crate) trait MastrGateway: Send + Sync {
    async fn power_sums(&self, query: &PowerSumsQuery) -> ToolboxResult<PowerSums>;
}

struct DefaultMastrGateway {
    config: MastrConfig,
}

#[async_trait]
impl MastrGateway for DefaultMastrGateway {
    async fn power_sums(&self, query: &PowerSumsQuery) -> ToolboxResult<PowerSums> {
        ToolboxService::power_sums(&self.config, query).await
    }
}

/// Map a toolbox failure to an MCP error, logging it to stderr.
fn map_toolbox_error(context: &str, error: &ToolboxError) -> McpError {
    if error.is_invalid_input() {
        tracing::warn!("{context} rejected: {error}");
        McpError::invalid_params(error.to_string(), None)
    } else {
        tracing::error!("Error making MaStR request: {error}");
        McpError::internal_error(format!("{context} failed: {error}"), None)
    }
}

/// Render the sums the way the tool has always answered.
pub(crate) fn format_power_sums(sums: &PowerSums) -> String {
    format!(
        "Bruttoleistung: {} kW \n Nettoleistung: {} kW \n",
        sums.gross_kw, sums.net_kw
    )
}

/// MCP Server for the Marktstammdatenregister.
#[derive(Clone)]
pub struct MastrMcp {
    /// Gateway performing the outbound MaStR request.
    gateway: Arc<dyn MastrGateway>,
    /// Tool router generated by macro.
    tool_router: ToolRouter<Self>,
}

impl MastrMcp {
    /// Create a server talking to the MaStR endpoint in `config`.
    #[must_use]
    pub fn new(config: MastrConfig) -> Self {
        Self::with_gateway(Arc::new(DefaultMastrGateway { config }))
    }

    pub(crate) fn with_gateway(gateway: Arc<dyn MastrGateway>) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl MastrMcp {
    /// Installed renewable power in Germany.
    #[tool(
        name = "get-sums",
        title = "MaStR-Leistung",
        description = "Liefert die installierte Leistung von erneuerbaren Energieträgern (Windkraft, Wasserkraft, Biomasse und Photovoltaik) in Deutschland. Bei Photovoltaik gilt: Die Bruttoleistung ist die Leistung der PV-Module, die Nettoleistung ist die Leistung aller Wechselrichter zusammen."
    )]
    async fn get_sums(
        &self,
        Parameters(params): Parameters<GetSumsParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = PowerSumsQuery::new(
            params.energy_source,
            params.state,
            params.plz.as_deref(),
            params.county.as_deref(),
        )
        .map_err(|e| map_toolbox_error("MaStR query", &e))?;

        let sums = self
            .gateway
            .power_sums(&query)
            .await
            .map_err(|e| map_toolbox_error("MaStR query", &e))?;

        Ok(CallToolResult::success(vec![Content::text(
            format_power_sums(&sums),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for MastrMcp {
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
                "MaStR MCP Server - installierte Leistung erneuerbarer Energien in Deutschland \
                 aus dem Marktstammdatenregister. get-sums liefert Brutto- und Nettoleistung in kW, \
                 optional gefiltert nach Bundesland, Postleitzahl oder Landkreis."
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
