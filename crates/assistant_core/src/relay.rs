use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::ResponseText;
use tracing::{info, warn};

use crate::{completion::CompletionProvider, error::UpstreamError};

pub const SYSTEM_DIRECTIVE: &str = "You are a Docker assistant. Answer concisely. \
If the answer is a code snippet, return only the snippet unless asked to explain it. \
Put each docker command on its own line.";

#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, message: &str) -> Result<ResponseText, UpstreamError>;
}

/// Single-exchange relay: one fixed system directive plus the user message.
#[derive(Clone)]
pub struct Relay {
    completion: Arc<dyn CompletionProvider>,
}

impl Relay {
    pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl Assistant for Relay {
    async fn ask(&self, message: &str) -> Result<ResponseText, UpstreamError> {
        info!(message_len = message.len(), "relaying query to completion service");
        match self.completion.complete(SYSTEM_DIRECTIVE, message).await {
            Ok(text) => {
                info!(response_len = text.len(), "completion received");
                Ok(ResponseText::new(text))
            }
            Err(error) => {
                warn!(%error, "completion failed");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/relay_tests.rs"]
mod tests;
