//! Groq client — an OpenAI-compatible `/chat/completions` backend.
//!
//! One bounded-time POST per completion; no streaming, no retries. Every
//! transport condition maps onto one of the four [`CompletionError`]
//! categories, and a missing API key fails closed before anything is sent.

use async_trait::async_trait;
use mina_config::AppConfig;
use mina_core::client::{CompletionClient, CompletionRequest};
use mina_core::error::CompletionError;
use mina_core::message::PromptMessage;
use serde::Deserialize;
use serde::Serialize;
use tracing::{debug, warn};

/// A client for Groq's OpenAI-compatible chat-completion endpoint.
pub struct GroqClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    http: reqwest::Client,
}

impl GroqClient {
    /// Create a new client. `api_key = None` produces a client whose every
    /// call fails closed with [`CompletionError::NotConfigured`].
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            max_tokens,
            http,
        }
    }

    /// Create a client from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.model.clone(),
            config.max_tokens,
            config.timeout_secs,
        )
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        // Fail closed: without a key nothing leaves the process.
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CompletionError::NotConfigured);
        };

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            temperature = request.temperature,
            "Sending completion request"
        );

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Connection(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Completion endpoint returned error");
            return Err(CompletionError::Connection(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Unexpected(format!("failed to parse response: {e}")))?;

        if let Some(usage) = &api_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion succeeded"
            );
        }

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Unexpected("no choices in response".into()))
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
