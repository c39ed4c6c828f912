use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ResponseText,
    error::ApiError,
    protocol::{chat_route, ChatRequest},
};
use tracing::{debug, warn};
use url::Url;

use crate::{error::UpstreamError, relay::Assistant};

pub struct RelayClient {
    http: Client,
    chat_url: Url,
}

impl RelayClient {
    pub fn new(server_url: &str) -> Result<Self, UpstreamError> {
        let server_url = server_url.trim_end_matches('/');
        let chat_url = Url::parse(&format!("{server_url}{}", chat_route()))?;
        Ok(Self {
            http: Client::new(),
            chat_url,
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

#[async_trait]
impl Assistant for RelayClient {
    async fn ask(&self, message: &str) -> Result<ResponseText, UpstreamError> {
        debug!(url = %self.chat_url, message_len = message.len(), "posting query to relay server");
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "relay server rejected query");
            return Err(match serde_json::from_str::<ApiError>(&body) {
                Ok(error) => UpstreamError::from_api_error(status.as_u16(), error),
                Err(_) => UpstreamError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let text: String = response.json().await?;
        Ok(ResponseText::new(text))
    }
}

#[cfg(test)]
#[path = "tests/relay_client_tests.rs"]
mod tests;
