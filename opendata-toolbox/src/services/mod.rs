//! Stateless service façade exposing all toolbox operations.
//!
//! Every method on [`ToolboxService`] is an async associated function; no instance needed.

mod mastr;
mod ntp;

use crate::config::{MastrConfig, NtpConfig};
use crate::error::ToolboxResult;
use crate::types::{NetworkTime, PowerSums, PowerSumsQuery};

/// Entry point for all outbound open-data operations.
///
/// ```rust,no_run
/// use opendata_toolbox::{EnergySource, MastrConfig, PowerSumsQuery, ToolboxService};
/// # async fn demo() -> opendata_toolbox::ToolboxResult<()> {
/// let query = PowerSumsQuery::new(EnergySource::Windkraft, None, None, None)?;
/// let sums = ToolboxService::power_sums(&MastrConfig::default(), &query).await?;
/// # Ok(())
/// # }
/// ```
pub struct ToolboxService;

impl ToolboxService {
    /// Query the summed gross and net power of all operating units matching `query`.
    ///
    /// Performs a single GET against the MaStR JSON endpoint; there are no retries.
    pub async fn power_sums(
        config: &MastrConfig,
        query: &PowerSumsQuery,
    ) -> ToolboxResult<PowerSums> {
        mastr::power_sums(config, query).await
    }

    /// Ask the configured NTP server for the current time.
    ///
    /// One SNTP request/response exchange, bounded by `config.timeout`.
    pub async fn network_time(config: &NtpConfig) -> ToolboxResult<NetworkTime> {
        ntp::network_time(config).await
    }
}
