use anyhow::Error;
use async_trait::async_trait;

use crate::core::AppConfig;
use crate::openai::{Message, completion};

/// Outcome of asking the service for the next message in a chat.
#[derive(Debug)]
pub enum Completion {
    /// At least one candidate message with content, in service order.
    Success(Vec<Message>),
    /// The call worked but nothing usable came back.
    Empty,
    /// Transport, protocol or API error.
    Failure(Error),
}

impl Completion {
    fn from_candidates(candidates: Vec<Message>) -> Self {
        if candidates.is_empty() {
            Completion::Empty
        } else {
            Completion::Success(candidates)
        }
    }
}

/// The only capability the conversation needs from a chat backend:
/// given a model and the full transcript, produce the next message.
#[async_trait]
pub trait CompletionService {
    async fn complete(&self, model: &str, messages: &[Message]) -> Completion;
}

pub struct OpenAiClient {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
}

impl OpenAiClient {
    // No request timeout is set, a stalled service stalls the session
    pub fn new(api_hostname: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.openai_api_hostname, &config.openai_api_key)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Completion {
        match completion(
            &self.client,
            messages,
            &self.api_hostname,
            &self.api_key,
            model,
        )
        .await
        {
            Ok(resp) => Completion::from_candidates(resp.candidates()),
            Err(err) => Completion::Failure(err),
        }
    }
}
