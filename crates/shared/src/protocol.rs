use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. The reply is the raw completion as a JSON string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

pub fn chat_route() -> &'static str {
    "/chat"
}

pub fn hello_route() -> &'static str {
    "/hello"
}

pub fn healthz_route() -> &'static str {
    "/healthz"
}
