//! CompletionClient trait — the abstraction over the remote completion service.
//!
//! A client knows how to submit an ordered, role-tagged message list and
//! return the generated text. The router calls `complete()` without knowing
//! which backend is behind it, which is also what makes the routing logic
//! testable with scripted stand-ins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;
use crate::message::PromptMessage;

/// One completion call: the assembled context plus the sampling temperature.
/// Constructed fresh per call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Ordered messages, system prompt first, newest user message last
    pub messages: Vec<PromptMessage>,

    /// Sampling temperature (0.1 = precise, 2.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.7
}

impl CompletionRequest {
    pub fn new(messages: Vec<PromptMessage>, temperature: f32) -> Self {
        Self {
            messages,
            temperature,
        }
    }
}

/// The completion-service abstraction.
///
/// Implementations perform one bounded-time remote call per request and map
/// every transport condition onto a [`CompletionError`] category. A missing
/// credential is reported as [`CompletionError::NotConfigured`] without
/// sending anything.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A short name for this client (e.g. "groq"), used in logs.
    fn name(&self) -> &str;

    /// Submit the request and return the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
