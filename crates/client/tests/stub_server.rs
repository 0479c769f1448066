//! Integration tests: run the real stdio transport against tiny `sh`
//! scripts standing in for the tool server.
//!
//! Most stubs drain stdin before answering. The ones near the bottom do
//! not: they exit or answer without reading, so the client's write may hit
//! a closed pipe, and the outcome must not depend on who wins that race.

#![cfg(unix)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tc_client::{ClientError, InvokeConfig, ServerLaunchConfig, StderrMode, ToolClient};

fn stub(script: &str) -> ServerLaunchConfig {
    ServerLaunchConfig {
        command: "sh".into(),
        args: vec!["-c".into(), script.into()],
        cwd: None,
        env: HashMap::new(),
        stderr: StderrMode::Null,
    }
}

fn client(script: &str) -> ToolClient {
    ToolClient::new(stub(script), InvokeConfig::default())
}

/// Reads the request line and prints it back verbatim.
const ECHO: &str = r#"IFS= read -r line; printf '%s\n' "$line""#;

#[tokio::test]
async fn echo_returns_request_structure() {
    let params = json!({
        "chain_id": 1,
        "assets": ["USDC", "DAI"],
        "nested": { "a": [1, 2.5, null] }
    });
    let value = client(ECHO)
        .invoke("get_reserve_data", params.clone())
        .await
        .unwrap();
    assert_eq!(value, json!({ "name": "get_reserve_data", "params": params }));
}

#[tokio::test]
async fn roundtrip_through_reserializing_stub() {
    // Swap key order on the way back; equality must not depend on it.
    let script = concat!(
        "cat > /dev/null; ",
        r#"printf '%s\n' '{"params":{"tokens":["WETH"],"chain_id":137},"name":"get_token_info"}'"#
    );
    let value = client(script)
        .invoke("get_token_info", json!({ "chain_id": 137, "tokens": ["WETH"] }))
        .await
        .unwrap();
    assert_eq!(
        value,
        json!({ "name": "get_token_info", "params": { "chain_id": 137, "tokens": ["WETH"] } })
    );
}

#[tokio::test]
async fn reserve_data_scenario_passes_through_unmodified() {
    let script = concat!(
        "cat > /dev/null; ",
        r#"printf '%s\n' '{"chain_id":1,"reserves":{"USDC":{"liquidityRate":"0.02"}}}'"#
    );
    let value = client(script)
        .invoke("get_reserve_data", json!({ "chain_id": 1, "assets": ["USDC"] }))
        .await
        .unwrap();
    assert_eq!(
        value,
        json!({ "chain_id": 1, "reserves": { "USDC": { "liquidityRate": "0.02" } } })
    );
}

#[tokio::test]
async fn missing_executable_is_launch_error() {
    let cfg = ServerLaunchConfig {
        command: "/nonexistent/tc-stub-server".into(),
        ..Default::default()
    };
    let client = ToolClient::new(cfg, InvokeConfig::default());

    let started = Instant::now();
    let err = client.invoke("get_reserve_data", json!({})).await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(err, ClientError::Launch { .. }));
    assert_eq!(err.error_type(), "CLIENT_ERROR");
    assert_eq!(err.to_string(), "MCP command not found");
}

#[tokio::test]
async fn silent_server_is_no_response() {
    let err = client("cat > /dev/null").invoke("x", json!({})).await.unwrap_err();
    assert!(matches!(err, ClientError::NoResponse));
}

#[tokio::test]
async fn blank_lines_only_is_no_response() {
    let err = client("cat > /dev/null; printf '\\n   \\n\\t\\n'")
        .invoke("x", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoResponse));
}

#[tokio::test]
async fn non_json_line_is_invalid_json() {
    let err = client("cat > /dev/null; echo not-json")
        .invoke("x", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidJson(_)));
    assert_eq!(err.to_string(), "Invalid JSON response from MCP");
}

#[tokio::test]
async fn only_first_non_empty_line_is_parsed() {
    let script = concat!(
        "cat > /dev/null; echo; echo '   '; ",
        r#"echo '{"first":true}'; echo not-json; echo '{"second":true}'"#
    );
    let value = client(script).invoke("x", json!({})).await.unwrap();
    assert_eq!(value, json!({ "first": true }));
}

#[tokio::test]
async fn trailing_output_after_answer_does_not_block() {
    // The server keeps printing after its answer; the client must not wait
    // for it to drain.
    let script = r#"cat > /dev/null; echo '{"ok":1}'; yes filler"#;
    let binding = client(script);
    let invoke = binding.invoke("x", json!({}));
    let value = tokio::time::timeout(Duration::from_secs(10), invoke)
        .await
        .expect("invoke should finish once the first line is read")
        .unwrap();
    assert_eq!(value, json!({ "ok": 1 }));
}

#[tokio::test]
async fn server_error_payload_is_ok_not_client_error() {
    let script = concat!(
        "cat > /dev/null; ",
        r#"echo '{"error":"chain 5 not supported","errorType":"TOOL_ERROR"}'; exit 3"#
    );
    let value = client(script)
        .invoke("get_reserve_data", json!({ "chain_id": 5 }))
        .await
        .unwrap();
    assert_eq!(value["errorType"], "TOOL_ERROR");
}

#[tokio::test]
async fn stuck_server_times_out() {
    let cfg = stub("sleep 30");
    let client = ToolClient::new(
        cfg,
        InvokeConfig {
            response_timeout_ms: Some(200),
        },
    );

    let started = Instant::now();
    let err = client.invoke("x", json!({})).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn child_sees_configured_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();

    let mut cfg = stub(r#"cat > /dev/null; printf '{"cwd":"%s"}\n' "$(pwd -P)""#);
    cfg.cwd = Some(dir.path().to_path_buf());
    let value = ToolClient::new(cfg, InvokeConfig::default())
        .invoke("x", json!({}))
        .await
        .unwrap();

    assert_eq!(value["cwd"], Value::String(canonical.display().to_string()));
}

#[tokio::test]
async fn child_sees_configured_env() {
    let mut cfg = stub(r#"cat > /dev/null; printf '{"rpc":"%s"}\n' "$TC_TEST_RPC_URL""#);
    cfg.env.insert("TC_TEST_RPC_URL".into(), "http://localhost:8545".into());
    let value = ToolClient::new(cfg, InvokeConfig::default())
        .invoke("x", json!({}))
        .await
        .unwrap();
    assert_eq!(value, json!({ "rpc": "http://localhost:8545" }));
}

#[tokio::test]
async fn flat_api_returns_legacy_error_object() {
    let value = client("cat > /dev/null").invoke_flat("x", json!({})).await;
    assert_eq!(
        value,
        json!({ "error": "No response from MCP", "errorType": "CLIENT_ERROR" })
    );
}

#[tokio::test]
async fn each_invocation_spawns_a_fresh_process() {
    let client = client(r#"cat > /dev/null; printf '{"pid":%s}\n' "$$""#);
    let a = client.invoke("x", json!({})).await.unwrap();
    let b = client.invoke("x", json!({})).await.unwrap();
    assert_ne!(a["pid"], b["pid"]);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Servers that never read their stdin
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Runs per test; the write/exit race goes both ways across this many.
const RACE_ROUNDS: usize = 30;

/// Bigger than any pipe buffer, so the write cannot finish unread.
fn oversized_params() -> Value {
    json!({ "blob": "x".repeat(200_000) })
}

#[tokio::test]
async fn server_exiting_without_reading_is_no_response() {
    let client = client("exit 0");
    for round in 0..RACE_ROUNDS {
        let err = client.invoke("x", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::NoResponse), "round {round}: {err:?}");
    }
}

#[tokio::test]
async fn garbage_from_non_reading_server_is_invalid_json() {
    let client = client("echo not-json");
    for round in 0..RACE_ROUNDS {
        let err = client.invoke("x", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidJson(_)), "round {round}: {err:?}");
    }
}

#[tokio::test]
async fn answer_survives_unread_large_request() {
    let client = client(r#"echo '{"ok":true}'"#);
    for round in 0..RACE_ROUNDS {
        let value = client.invoke("x", oversized_params()).await;
        assert_eq!(value.unwrap(), json!({ "ok": true }), "round {round}");
    }
}

#[tokio::test]
async fn large_request_to_exiting_server_is_no_response() {
    let client = client("exit 0");
    for round in 0..RACE_ROUNDS {
        let err = client.invoke("x", oversized_params()).await.unwrap_err();
        assert!(matches!(err, ClientError::NoResponse), "round {round}: {err:?}");
    }
}

#[tokio::test]
async fn deadline_covers_blocked_write() {
    let client = ToolClient::new(
        stub("sleep 30"),
        InvokeConfig {
            response_timeout_ms: Some(200),
        },
    );
    for round in 0..3 {
        let started = Instant::now();
        let err = client.invoke("x", oversized_params()).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout), "round {round}: {err:?}");
        assert!(started.elapsed() < Duration::from_secs(5), "round {round}");
    }
}
