//! # MINA Providers
//!
//! Completion-service client implementations. The routing core only sees
//! the [`CompletionClient`] trait; this crate supplies the real backend and
//! the factory the shells call.

pub mod groq;

pub use groq::GroqClient;

use std::sync::Arc;

use mina_config::AppConfig;
use mina_core::CompletionClient;

/// Build the completion client described by the configuration.
pub fn build_client(config: &AppConfig) -> Arc<dyn CompletionClient> {
    Arc::new(GroqClient::from_config(config))
}
