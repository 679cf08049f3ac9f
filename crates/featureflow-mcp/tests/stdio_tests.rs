//! End-to-end tests of the `featureflow-mcp` binary over stdio

use std::process::Stdio;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the binary with `input` on stdin and collect every response line.
async fn run_session(api_url: &str, input: &[Value]) -> Vec<Value> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_featureflow-mcp"))
        .env("FEATUREFLOW_API_URL", api_url)
        .env("FEATUREFLOW_API_TOKEN", "e2e-token")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    for message in input {
        stdin.write_all(message.to_string().as_bytes()).await.unwrap();
        stdin.write_all(b"\n").await.unwrap();
    }
    drop(stdin);

    let stdout = child.stdout.take().unwrap();
    let collect = async {
        let mut lines = BufReader::new(stdout).lines();
        let mut responses = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            responses.push(serde_json::from_str::<Value>(&line).unwrap());
        }
        responses
    };
    let responses = tokio::time::timeout(Duration::from_secs(30), collect)
        .await
        .expect("server did not finish after stdin closed");

    let status = tokio::time::timeout(Duration::from_secs(10), child.wait())
        .await
        .expect("server did not exit")
        .unwrap();
    assert!(status.success());

    responses
}

fn by_id(responses: &[Value], id: i64) -> &Value {
    responses
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("no response with id {id}"))
}

#[tokio::test]
async fn full_session_over_stdio() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/acme"))
        .and(header("Authorization", "Bearer e2e-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "acme"})))
        .mount(&api)
        .await;

    let responses = run_session(
        &format!("{}/api/", api.uri()),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "e2e", "version": "0.0.1"}
            }}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
                "name": "get_project",
                "arguments": {"idOrKey": "acme"}
            }}),
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {
                "name": "unknown_tool"
            }}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 4, "notification must not be answered");
    assert_eq!(by_id(&responses, 1)["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(
        by_id(&responses, 2)["result"]["tools"].as_array().unwrap().len(),
        22
    );
    assert_eq!(
        by_id(&responses, 3)["result"]["content"][0]["text"],
        "{\n  \"key\": \"acme\"\n}"
    );
    assert_eq!(
        by_id(&responses, 4)["result"]["content"][0]["text"],
        "Unknown tool: unknown_tool"
    );
}

#[tokio::test]
async fn slow_call_does_not_block_later_requests() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&api)
        .await;

    let responses = run_session(
        &format!("{}/api", api.uri()),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": {
                "name": "list_projects",
                "arguments": {}
            }}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    // The ping overtakes the delayed API call.
    assert_eq!(responses[0]["id"], 2);
    assert_eq!(responses[1]["id"], 1);
    assert_eq!(responses[1]["result"]["content"][0]["text"], "[]");
}

#[tokio::test]
async fn malformed_line_gets_parse_error_and_session_continues() {
    let api = MockServer::start().await;

    let mut child = Command::new(env!("CARGO_BIN_EXE_featureflow-mcp"))
        .env("FEATUREFLOW_API_URL", format!("{}/api", api.uri()))
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"{this is not json\n").await.unwrap();
    stdin
        .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"ping\"}\n")
        .await
        .unwrap();
    drop(stdin);

    let output = tokio::time::timeout(Duration::from_secs(30), child.wait_with_output())
        .await
        .expect("server did not exit")
        .unwrap();
    let responses: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    let parse_error = responses.iter().find(|r| r.get("error").is_some()).unwrap();
    assert_eq!(parse_error["error"]["code"], -32700);
    assert_eq!(by_id(&responses, 5)["result"], json!({}));
}
