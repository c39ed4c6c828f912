use std::sync::Arc;

use assistant_core::{Assistant, CompletionProvider, Relay};
use shared::{domain::ResponseText, error::ApiError};

#[derive(Clone)]
pub struct ApiContext {
    pub relay: Relay,
}

impl ApiContext {
    pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            relay: Relay::new(completion),
        }
    }
}

pub async fn chat(ctx: &ApiContext, message: &str) -> Result<ResponseText, ApiError> {
    ctx.relay
        .ask(message)
        .await
        .map_err(|error| error.to_api_error())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
