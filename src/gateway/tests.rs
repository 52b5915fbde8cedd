use super::*;
use crate::utils::test_utils::{closed_port_addr, direct_client, spawn_http_responder};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Echoes what it received so tests can see what the gateway passed on.
struct EchoHandler {
    name: &'static str,
}

#[async_trait]
impl McpHandler for EchoHandler {
    async fn handle(&self, request: Request) -> Result<Response, HandlerError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, 1024 * 1024)
            .await
            .map_err(|err| HandlerError::with_source("failed to read body", err))?;
        let payload = json!({
            "handler": self.name,
            "method": parts.method.as_str(),
            "path": parts.uri.path(),
            "query": parts.uri.query(),
            "body": String::from_utf8_lossy(&body),
        });
        Ok(Json(payload).into_response())
    }
}

struct FailingHandler {
    message: &'static str,
}

#[async_trait]
impl McpHandler for FailingHandler {
    async fn handle(&self, _request: Request) -> Result<Response, HandlerError> {
        Err(HandlerError::new(self.message))
    }
}

struct PanickingHandler;

#[async_trait]
impl McpHandler for PanickingHandler {
    async fn handle(&self, _request: Request) -> Result<Response, HandlerError> {
        panic!("graph index corrupted");
    }
}

fn echo_handlers() -> Handlers {
    Handlers {
        memory: Arc::new(EchoHandler { name: "memory" }),
        filesystem: Arc::new(EchoHandler { name: "filesystem" }),
        github: Arc::new(EchoHandler { name: "github" }),
    }
}

struct RunningGateway {
    base_url: String,
    shutdown: CancellationToken,
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn start_gateway(handlers: Handlers) -> RunningGateway {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let shutdown = CancellationToken::new();
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        serve_listener(listener, handlers, server_shutdown)
            .await
            .expect("gateway should serve");
    });

    RunningGateway {
        base_url: format!("http://{addr}"),
        shutdown,
    }
}

#[tokio::test]
async fn health_reports_healthy() {
    let gateway = start_gateway(echo_handlers()).await;

    let response = direct_client()
        .get(format!("{}/health", gateway.base_url))
        .send()
        .await
        .expect("health request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn each_prefix_reaches_its_own_handler_with_prefix_stripped() {
    let gateway = start_gateway(echo_handlers()).await;
    let client = direct_client();

    for mount in Mount::ALL {
        let response = client
            .post(format!("{}{}/tools/call?id=7", gateway.base_url, mount.prefix()))
            .body(r#"{"name":"read"}"#)
            .send()
            .await
            .expect("mounted request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("json body");
        assert_eq!(body["handler"], mount.name());
        assert_eq!(body["method"], "POST");
        assert_eq!(body["path"], "/tools/call");
        assert_eq!(body["query"], "id=7");
        assert_eq!(body["body"], r#"{"name":"read"}"#);
    }
}

#[tokio::test]
async fn bare_prefix_is_delegated_as_root() {
    let gateway = start_gateway(echo_handlers()).await;

    let response = direct_client()
        .get(format!("{}/mcp/github", gateway.base_url))
        .send()
        .await
        .expect("mounted request");

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["handler"], "github");
    assert_eq!(body["path"], "/");
}

#[tokio::test]
async fn handler_failure_becomes_500_with_message() {
    let handlers = Handlers {
        memory: Arc::new(FailingHandler {
            message: "knowledge graph unavailable",
        }),
        ..echo_handlers()
    };
    let gateway = start_gateway(handlers).await;

    let response = direct_client()
        .get(format!("{}/mcp/memory/entities", gateway.base_url))
        .send()
        .await
        .expect("mounted request");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({ "error": "knowledge graph unavailable" }));
}

#[tokio::test]
async fn handler_panic_becomes_500_and_gateway_keeps_serving() {
    let handlers = Handlers {
        github: Arc::new(PanickingHandler),
        ..echo_handlers()
    };
    let gateway = start_gateway(handlers).await;

    let response = direct_client()
        .post(format!("{}/mcp/github/issues", gateway.base_url))
        .send()
        .await
        .expect("mounted request");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({ "error": "graph index corrupted" }));

    let health = direct_client()
        .get(format!("{}/health", gateway.base_url))
        .send()
        .await
        .expect("health request");
    assert_eq!(health.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let gateway = start_gateway(echo_handlers()).await;

    let response = direct_client()
        .get(format!("{}/mcp/unknown/x", gateway.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unconfigured_mounts_fail_with_their_name() {
    let settings = GatewaySettings::default();
    let gateway = start_gateway(handlers_from_settings(&settings, &direct_client())).await;

    let response = direct_client()
        .post(format!("{}/mcp/filesystem/read", gateway.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({ "error": "filesystem handler is not configured" }));
}

#[tokio::test]
async fn proxy_forwards_to_upstream_and_injects_token() {
    let (upstream, captured) = spawn_http_responder(vec![(201, r#"{"ok":true}"#)]).await;
    let settings = GatewaySettings {
        github_token: Some("ghp_test".to_string()),
        github_upstream: Some(format!("http://{upstream}")),
        ..GatewaySettings::default()
    };
    let gateway = start_gateway(handlers_from_settings(&settings, &direct_client())).await;

    let response = direct_client()
        .post(format!("{}/mcp/github/mcp?session=1", gateway.base_url))
        .header("content-type", "application/json")
        .body(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
        .send()
        .await
        .expect("proxied request");

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({ "ok": true }));

    let captured = captured.lock().await;
    assert_eq!(captured.len(), 1);
    assert!(captured[0].request_line.starts_with("POST /mcp?session=1 "));
    assert_eq!(captured[0].header("authorization"), Some("Bearer ghp_test"));
    assert_eq!(captured[0].header("content-type"), Some("application/json"));
    assert_eq!(captured[0].json_body()["method"], "tools/list");
}

#[tokio::test]
async fn filesystem_proxy_carries_allow_list() {
    let (upstream, captured) = spawn_http_responder(vec![(200, "{}")]).await;
    let settings = GatewaySettings {
        allowed_paths: vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")],
        filesystem_upstream: Some(format!("http://{upstream}/")),
        ..GatewaySettings::default()
    };
    let gateway = start_gateway(handlers_from_settings(&settings, &direct_client())).await;

    let response = direct_client()
        .get(format!("{}/mcp/filesystem/list", gateway.base_url))
        .send()
        .await
        .expect("proxied request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let captured = captured.lock().await;
    assert!(captured[0].request_line.starts_with("GET /list "));
    assert_eq!(captured[0].header(ALLOWED_PATHS_HEADER), Some("/srv/a:/srv/b"));
    assert_eq!(captured[0].header("authorization"), None);
}

#[tokio::test]
async fn unreachable_upstream_becomes_500() {
    let dead = closed_port_addr().await;
    let settings = GatewaySettings {
        memory_upstream: Some(format!("http://{dead}")),
        ..GatewaySettings::default()
    };
    let gateway = start_gateway(handlers_from_settings(&settings, &direct_client())).await;

    let response = direct_client()
        .get(format!("{}/mcp/memory/graph", gateway.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("json body");
    let message = body["error"].as_str().expect("error message");
    assert!(message.starts_with("memory upstream request failed"));
}
