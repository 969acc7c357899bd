use super::test_mocks::*;
use super::*;

use opendata_toolbox::{EnergySource, FederalState};

fn params(
    energy_source: EnergySource,
    state: Option<FederalState>,
    plz: Option<&str>,
    county: Option<&str>,
) -> Parameters<GetSumsParams> {
    Parameters(GetSumsParams {
        energy_source,
        state,
        plz: plz.map(str::to_string),
        county: county.map(str::to_string),
    })
}

fn text_of(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .unwrap()
}

#[test]
fn formats_sums_like_the_original_tool() {
    let text = format_power_sums(&PowerSums {
        gross_kw: 12_345.67,
        net_kw: 12_000.0,
    });
    assert_eq!(
        text,
        "Bruttoleistung: 12345.67 kW \n Nettoleistung: 12000 kW \n"
    );
}

#[tokio::test]
async fn get_sums_returns_formatted_text() {
    let gateway = Arc::new(MockMastrGateway::default());
    let server = build_server(Arc::clone(&gateway));

    let result = server
        .get_sums(params(EnergySource::Photovoltaik, None, None, None))
        .await
        .unwrap();

    assert_ne!(result.is_error, Some(true));
    assert_eq!(
        text_of(&result),
        "Bruttoleistung: 1500.5 kW \n Nettoleistung: 1400 kW \n"
    );
}

#[tokio::test]
async fn get_sums_forwards_normalised_filters() {
    let gateway = Arc::new(MockMastrGateway::default());
    let server = build_server(Arc::clone(&gateway));

    server
        .get_sums(params(
            EnergySource::Windkraft,
            Some(FederalState::Niedersachsen),
            Some(" 26603 "),
            Some(""),
        ))
        .await
        .unwrap();

    let calls = gateway.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].energy_source, EnergySource::Windkraft);
    assert_eq!(calls[0].state, Some(FederalState::Niedersachsen));
    assert_eq!(calls[0].postal_code.as_deref(), Some("26603"));
    assert_eq!(calls[0].county, None);
}

#[tokio::test]
async fn invalid_postal_code_is_rejected_before_any_request() {
    let gateway = Arc::new(MockMastrGateway::default());
    let server = build_server(Arc::clone(&gateway));

    let error = server
        .get_sums(params(EnergySource::Biomasse, None, Some("abc"), None))
        .await
        .unwrap_err();

    assert_eq!(error.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn gateway_failure_becomes_internal_error() {
    let gateway = Arc::new(MockMastrGateway::default());
    gateway
        .set_error(Some(ToolboxError::HttpStatus {
            status: 502,
            body: "Bad Gateway".to_string(),
        }))
        .await;
    let server = build_server(Arc::clone(&gateway));

    let error = server
        .get_sums(params(EnergySource::Wasserkraft, None, None, None))
        .await
        .unwrap_err();

    assert_eq!(error.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    assert!(error.message.contains("HTTP error! status: 502"));
}

#[test]
fn server_info_names_the_server() {
    let server = build_server(Arc::new(MockMastrGateway::default()));
    let info = server.get_info();
    assert_eq!(info.server_info.name, "mastr-mcp");
    assert_eq!(info.server_info.version, "1.0.0");
    assert!(info.capabilities.tools.is_some());
}
