//! Open-data clients behind the MaStR and NTP MCP servers
//!
//! Two stateless operations, each performing exactly one outbound request:
//! summed installed power from the Marktstammdatenregister (HTTP/JSON) and the
//! current date from a network time server (SNTP over UDP).

mod config;
mod error;
mod services;
mod types;
mod utils;

pub use config::{
    MastrConfig, NtpConfig, DEFAULT_MASTR_API_BASE, DEFAULT_NTP_SERVER, DEFAULT_USER_AGENT,
};
pub use error::{ToolboxError, ToolboxResult};
pub use services::ToolboxService;
pub use types::{EnergySource, FederalState, NetworkTime, PowerSums, PowerSumsQuery};
