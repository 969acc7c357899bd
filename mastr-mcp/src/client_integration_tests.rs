use super::test_mocks::*;
use super::*;

use rmcp::model::CallToolRequestParams;
use rmcp::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn the server and connect a client via in-memory duplex transport.
async fn spawn_client_server(
    gateway: Arc<MockMastrGateway>,
) -> (
    rmcp::service::RunningService<rmcp::RoleClient, ()>,
    tokio::task::JoinHandle<anyhow::Result<()>>,
) {
    let (server_transport, client_transport) = tokio::io::duplex(4096);

    let server = build_server(gateway);

    let server_handle = tokio::spawn(async move {
        server.serve(server_transport).await?.waiting().await?;
        anyhow::Ok(())
    });

    let client = ().serve(client_transport).await.unwrap();
    (client, server_handle)
}

async fn spawn_default() -> (
    rmcp::service::RunningService<rmcp::RoleClient, ()>,
    tokio::task::JoinHandle<anyhow::Result<()>>,
) {
    spawn_client_server(Arc::new(MockMastrGateway::default())).await
}

fn call_params(name: &str, args: &serde_json::Value) -> CallToolRequestParams {
    CallToolRequestParams {
        meta: None,
        name: name.to_string().into(),
        arguments: args.as_object().cloned(),
        task: None,
    }
}

fn extract_text(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .expect("expected text content in result")
}

// ===========================================================================
// Handshake and tool listing
// ===========================================================================

#[tokio::test]
async fn client_receives_server_info() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let server_info = client
        .peer_info()
        .expect("server info should be set after handshake");

    assert_eq!(server_info.server_info.name, "mastr-mcp");
    assert!(server_info.capabilities.tools.is_some());

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn tools_list_contains_only_get_sums() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let tools = client.list_all_tools().await?;

    assert_eq!(tools.len(), 1);
    let tool = &tools[0];
    assert_eq!(tool.name, "get-sums");
    assert_eq!(tool.title.as_deref(), Some("MaStR-Leistung"));
    assert!(tool
        .description
        .as_deref()
        .is_some_and(|d| d.contains("Wechselrichter")));

    let required = tool
        .input_schema
        .get("required")
        .and_then(|v| v.as_array())
        .expect("get-sums should declare required fields");
    assert_eq!(required.len(), 1);
    assert_eq!(required[0], "type");

    let properties = tool
        .input_schema
        .get("properties")
        .and_then(|v| v.as_object())
        .expect("get-sums should declare properties");
    for key in ["type", "state", "plz", "county"] {
        assert!(properties.contains_key(key), "missing property {key}");
    }

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

// ===========================================================================
// tools/call
// ===========================================================================

#[tokio::test]
async fn call_get_sums_returns_text() -> anyhow::Result<()> {
    let gateway = Arc::new(MockMastrGateway::default());
    let (client, server_handle) = spawn_client_server(Arc::clone(&gateway)).await;

    let result = client
        .call_tool(call_params(
            "get-sums",
            &serde_json::json!({"type": "Windkraft", "state": "Thüringen", "county": "Gotha"}),
        ))
        .await?;

    assert_ne!(result.is_error, Some(true));
    assert_eq!(
        extract_text(&result),
        "Bruttoleistung: 1500.5 kW \n Nettoleistung: 1400 kW \n"
    );

    let calls = gateway.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].county.as_deref(), Some("Gotha"));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_with_unknown_energy_source_fails() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params(
            "get-sums",
            &serde_json::json!({"type": "Kernkraft"}),
        ))
        .await;

    assert!(result.is_err(), "unknown energy source should fail");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_without_type_fails() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params("get-sums", &serde_json::json!({"plz": "10115"})))
        .await;

    assert!(result.is_err(), "missing type should fail");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn gateway_timeout_is_reported_to_client() -> anyhow::Result<()> {
    let gateway = Arc::new(MockMastrGateway::default());
    gateway
        .set_error(Some(ToolboxError::Timeout(
            "MaStR request timed out".to_string(),
        )))
        .await;
    let (client, server_handle) = spawn_client_server(Arc::clone(&gateway)).await;

    let result = client
        .call_tool(call_params(
            "get-sums",
            &serde_json::json!({"type": "Photovoltaik"}),
        ))
        .await;

    let err = result.expect_err("timeout should propagate").to_string();
    assert!(err.contains("timed out"), "got: {err}");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_nonexistent_tool_returns_error() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params("get-time", &serde_json::json!({})))
        .await;

    assert!(result.is_err(), "get-time belongs to the NTP server");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}
