//! MaStR power-sum query module.

use std::sync::LazyLock;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::config::MastrConfig;
use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{PowerSums, PowerSumsQuery};
use crate::utils::truncate_for_log;

/// Shared HTTP client; timeout and headers are set per request.
static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

const SUMS_PATH: &str = "/Einheit/EinheitJson/GetSummenDerLeistungswerte";
/// Grid of the public unit search ("Stromerzeugungseinheiten").
const GRID_NAME: &str = "extSEE";
/// `Betriebs-Status` 35 = in Betrieb.
const OPERATING_STATUS: &str = "35";

/// Response of `GetSummenDerLeistungswerte`. Sums are `null` when nothing matches.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SumsResponse {
    #[serde(default)]
    bruttoleistung_summe: Option<f64>,
    #[serde(default)]
    nettoleistung_summe: Option<f64>,
}

/// Build the filter expression in MaStR's Kendo-style syntax.
///
/// Clause order is fixed: status, county, energy source, postal code, state.
/// Quotes are sent pre-encoded as `%27`.
fn build_filter(query: &PowerSumsQuery) -> String {
    let mut clauses = vec![format!("Betriebs-Status~eq~%27{OPERATING_STATUS}%27")];

    if let Some(county) = &query.county {
        clauses.push(format!(
            "~and~Landkreis~ct~%27{}%27",
            urlencoding::encode(county)
        ));
    }
    clauses.push(format!(
        "~and~Energietr%C3%A4ger~eq~%27{}%27",
        query.energy_source.code()
    ));
    if let Some(plz) = &query.postal_code {
        clauses.push(format!(
            "~and~Postleitzahl~eq~%27{}%27",
            urlencoding::encode(plz)
        ));
    }
    if let Some(state) = query.state {
        clauses.push(format!("~and~Bundesland~eq~%27{}%27", state.code()));
    }

    clauses.concat()
}

fn build_url(base_url: &str, query: &PowerSumsQuery) -> String {
    format!(
        "{}{SUMS_PATH}?gridName={GRID_NAME}&filter={}",
        base_url.trim_end_matches('/'),
        build_filter(query)
    )
}

fn map_request_error(e: &reqwest::Error) -> ToolboxError {
    if e.is_timeout() {
        ToolboxError::Timeout(format!("MaStR request timed out: {e}"))
    } else {
        ToolboxError::NetworkError(format!("Request failed: {e}"))
    }
}

/// Fetch the power sums for `query`.
pub async fn power_sums(config: &MastrConfig, query: &PowerSumsQuery) -> ToolboxResult<PowerSums> {
    let url = build_url(&config.base_url, query);
    log::debug!("[MaStR] GET {url}");

    let response = HTTP_CLIENT
        .get(&url)
        .header(USER_AGENT, config.user_agent.as_str())
        .header(ACCEPT, "application/json")
        .timeout(config.timeout)
        .send()
        .await
        .map_err(|e| map_request_error(&e))?;

    let status = response.status();
    log::debug!("[MaStR] Response Status: {}", status.as_u16());

    let body = response.text().await.map_err(|e| map_request_error(&e))?;

    if !status.is_success() {
        log::warn!("[MaStR] HTTP {}: {}", status.as_u16(), truncate_for_log(&body));
        return Err(ToolboxError::HttpStatus {
            status: status.as_u16(),
            body: truncate_for_log(&body),
        });
    }

    log::debug!("[MaStR] Response Body: {}", truncate_for_log(&body));

    let sums: SumsResponse = serde_json::from_str(&body).map_err(|e| {
        log::error!("[MaStR] JSON parse failed: {e}");
        log::error!("[MaStR] Raw response: {}", truncate_for_log(&body));
        ToolboxError::ParseError(format!("Failed to parse MaStR response: {e}"))
    })?;

    Ok(PowerSums {
        gross_kw: sums.bruttoleistung_summe.unwrap_or_default(),
        net_kw: sums.nettoleistung_summe.unwrap_or_default(),
    })
}
