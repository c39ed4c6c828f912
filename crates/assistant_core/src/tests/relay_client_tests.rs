use super::*;
use axum::{http::StatusCode, routing::post, Json, Router};
use shared::error::ErrorCode;
use tokio::net::TcpListener;

async fn spawn_relay_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn decodes_json_string_reply() {
    let app = Router::new().route(
        "/chat",
        post(|Json(req): Json<ChatRequest>| async move {
            Json(format!("echo: {}\ndocker ps", req.message))
        }),
    );
    let server_url = spawn_relay_server(app).await;

    let client = RelayClient::new(&server_url).expect("client");
    let response = client.ask("list containers").await.expect("response");
    assert_eq!(response.as_str(), "echo: list containers\ndocker ps");
}

#[tokio::test]
async fn api_error_envelope_maps_to_upstream_error() {
    let app = Router::new().route(
        "/chat",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ApiError::new(ErrorCode::RateLimited, "slow down")),
            )
        }),
    );
    let server_url = spawn_relay_server(app).await;

    let client = RelayClient::new(&server_url).expect("client");
    let err = client.ask("hi").await.expect_err("rate limited");
    assert!(matches!(err, UpstreamError::RateLimited));
}

#[tokio::test]
async fn non_envelope_failure_keeps_body() {
    let app = Router::new().route(
        "/chat",
        post(|| async { (StatusCode::BAD_GATEWAY, "gateway exploded") }),
    );
    let server_url = spawn_relay_server(app).await;

    let client = RelayClient::new(&server_url).expect("client");
    match client.ask("hi").await {
        Err(UpstreamError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "gateway exploded");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = RelayClient::new(&format!("http://{addr}")).expect("client");
    let err = client.ask("hi").await.expect_err("unreachable");
    assert!(matches!(err, UpstreamError::Transport(_)));
}

#[test]
fn chat_url_is_joined_onto_server_url() {
    let client = RelayClient::new("http://localhost:8787").expect("client");
    assert_eq!(client.chat_url().as_str(), "http://localhost:8787/chat");
}

#[test]
fn chat_url_keeps_server_path_prefix() {
    let client = RelayClient::new("http://proxy.local/assistant").expect("client");
    assert_eq!(client.chat_url().as_str(), "http://proxy.local/assistant/chat");

    let client = RelayClient::new("http://proxy.local/assistant/").expect("client");
    assert_eq!(client.chat_url().as_str(), "http://proxy.local/assistant/chat");
}

#[tokio::test]
async fn posts_under_server_path_prefix() {
    let app = Router::new().route(
        "/assistant/chat",
        post(|Json(req): Json<ChatRequest>| async move { Json(req.message) }),
    );
    let server_url = spawn_relay_server(app).await;

    let client = RelayClient::new(&format!("{server_url}/assistant")).expect("client");
    let response = client.ask("docker ps").await.expect("response");
    assert_eq!(response.as_str(), "docker ps");
}
