use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use assistant_core::OpenAiCompletion;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{chat_route, healthz_route, hello_route, ChatRequest, HelloResponse},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, info_span, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod api;
mod app_state;
mod config;
#[cfg(unix)]
mod unix_socket;

use api::ApiContext;
use app_state::AppState;
use config::{load_settings, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    if settings.api_key.is_empty() {
        warn!("no api key configured; set OPENAI_API_KEY or APP__API_KEY");
    }
    let completion = OpenAiCompletion::new(&settings.api_url, settings.api_key.as_str(), settings.model.as_str())
        .context("failed to build completion client")?;
    info!(api_url = %settings.api_url, model = completion.model(), "completion client ready");

    let state = AppState {
        api: ApiContext::new(Arc::new(completion)),
        max_body_bytes: settings.max_body_bytes,
    };
    let app = build_router(Arc::new(state));
    serve(&settings, app).await
}

#[cfg(unix)]
async fn serve(settings: &Settings, app: Router) -> anyhow::Result<()> {
    let Some(path) = &settings.socket_path else {
        return serve_tcp(settings, app).await;
    };
    let listener = unix_socket::bind(path)
        .with_context(|| format!("failed to listen on socket '{}'", path.display()))?;
    info!(socket = %path.display(), "relay listening");
    unix_socket::serve(listener, app).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn serve(settings: &Settings, app: Router) -> anyhow::Result<()> {
    if settings.socket_path.is_some() {
        warn!("socket_path needs unix domain sockets; listening on bind_addr instead");
    }
    serve_tcp(settings, app).await
}

async fn serve_tcp(settings: &Settings, app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind_addr '{}'", settings.bind_addr))?;
    info!(%addr, "relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.max_body_bytes;
    Router::new()
        .route(healthz_route(), get(healthz))
        .route(hello_route(), get(hello))
        .route(chat_route(), get(chat_ready).post(chat))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri()
                )
            }),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "hello".into(),
    })
}

async fn chat_ready() -> &'static str {
    "ok"
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<String>, (StatusCode, Json<ApiError>)> {
    let response = api::chat(&state.api, &req.message)
        .await
        .map_err(|e| (status_for(e.code), Json(e)))?;
    Ok(Json(response.into_inner()))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized | ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
