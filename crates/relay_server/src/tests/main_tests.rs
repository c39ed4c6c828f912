use super::*;
use assistant_core::{CompletionProvider, UpstreamError};
use async_trait::async_trait;
use axum::body;
use tokio::sync::Mutex;
use tower::ServiceExt;

enum Reply {
    Text(&'static str),
    RateLimited,
    Status(u16),
}

struct StubCompletion {
    reply: Reply,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionProvider for StubCompletion {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, UpstreamError> {
        self.seen.lock().await.push(user.to_string());
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::RateLimited => Err(UpstreamError::RateLimited),
            Reply::Status(status) => Err(UpstreamError::Status {
                status,
                body: "boom".into(),
            }),
        }
    }
}

fn test_app(reply: Reply) -> (Router, Arc<StubCompletion>) {
    let completion = Arc::new(StubCompletion {
        reply,
        seen: Mutex::new(Vec::new()),
    });
    let state = AppState {
        api: ApiContext::new(completion.clone()),
        max_body_bytes: 1024,
    };
    (build_router(Arc::new(state)), completion)
}

fn chat_request(body: String) -> Request<Body> {
    Request::post("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _) = test_app(Reply::Text(""));
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn hello_returns_message_object() {
    let (app, _) = test_app(Reply::Text(""));
    let request = Request::get("/hello").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json, serde_json::json!({ "Message": "hello" }));
}

#[tokio::test]
async fn chat_get_reports_ok() {
    let (app, _) = test_app(Reply::Text(""));
    let request = Request::get("/chat").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_post_returns_completion_as_json_string() {
    let (app, completion) = test_app(Reply::Text("Run:\ndocker ps\nDone."));
    let request = chat_request(serde_json::json!({ "message": "list containers" }).to_string());
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let text: String = serde_json::from_slice(&body).expect("json string");
    assert_eq!(text, "Run:\ndocker ps\nDone.");
    assert_eq!(completion.seen.lock().await.as_slice(), &["list containers"]);
}

#[tokio::test]
async fn chat_post_without_message_relays_empty_string() {
    let (app, completion) = test_app(Reply::Text("ok"));
    let response = app
        .oneshot(chat_request("{}".into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(completion.seen.lock().await.as_slice(), &[""]);
}

#[tokio::test]
async fn upstream_rate_limit_maps_to_429_envelope() {
    let (app, _) = test_app(Reply::RateLimited);
    let response = app
        .oneshot(chat_request(r#"{"message":"hi"}"#.into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let error: ApiError = serde_json::from_slice(&body).expect("error envelope");
    assert_eq!(error.code, ErrorCode::RateLimited);
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let (app, _) = test_app(Reply::Status(500));
    let response = app
        .oneshot(chat_request(r#"{"message":"hi"}"#.into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (app, completion) = test_app(Reply::Text("ok"));
    let message = "x".repeat(4096);
    let response = app
        .oneshot(chat_request(
            serde_json::json!({ "message": message }).to_string(),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(completion.seen.lock().await.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn router_answers_over_unix_socket() {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::UnixStream,
    };

    let (app, _) = test_app(Reply::Text(""));
    let path = std::env::temp_dir().join(format!("relay_main_{}.sock", Uuid::new_v4()));
    let listener = unix_socket::bind(&path).expect("bind");
    tokio::spawn(unix_socket::serve(listener, app));

    let mut stream = UnixStream::connect(&path).await.expect("connect");
    stream
        .write_all(b"GET /hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with(r#"{"Message":"hello"}"#), "{response}");

    std::fs::remove_file(&path).expect("cleanup");
}
