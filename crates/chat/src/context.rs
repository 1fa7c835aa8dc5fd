//! Prompt window assembly for completion requests.
//!
//! The builder turns the session log into the bounded, role-tagged message
//! list a completion backend expects: the active personality prompt first,
//! a window of recent history in the middle, the message being answered
//! last. The log itself is never mutated; long sessions keep growing
//! locally while every outbound request stays the same bounded size.
//!
//! # Determinism
//!
//! Assembly is a pure function of its inputs: identical log, prompt and
//! message always produce the identical result.

use mina_core::{ConversationLog, PromptMessage};

/// How many of the most recent log entries are considered per request.
///
/// The trailing entry of that slice is the message currently being answered
/// and is re-sent as the final user message, so at most `HISTORY_WINDOW - 1`
/// entries travel as history.
pub const HISTORY_WINDOW: usize = 20;

/// Builds the message window submitted to the completion backend.
///
/// Stateless apart from the window size; create one and reuse it.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    window: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    /// Create a builder with the default window ([`HISTORY_WINDOW`]).
    pub fn new() -> Self {
        Self {
            window: HISTORY_WINDOW,
        }
    }

    /// Create a builder with a custom window size.
    pub fn with_window(window: usize) -> Self {
        Self { window }
    }

    /// The configured window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Assemble the outbound message list for one completion call.
    ///
    /// Call this only after `user_message` has been appended to `log`: the
    /// builder assumes the log's trailing entry is the message being
    /// answered and excludes it from the history window rather than sending
    /// it twice.
    ///
    /// The result is always `system_prompt` first and `user_message` last,
    /// with at most `window - 1` history entries in between, in log order.
    pub fn build(
        &self,
        log: &ConversationLog,
        system_prompt: &str,
        user_message: &str,
    ) -> Vec<PromptMessage> {
        let mut messages = Vec::with_capacity(self.window + 1);
        messages.push(PromptMessage::system(system_prompt));

        let entries = &log.messages;
        let start = entries.len().saturating_sub(self.window);
        if let Some((_, history)) = entries[start..].split_last() {
            messages.extend(history.iter().map(PromptMessage::from));
        }

        messages.push(PromptMessage::user(user_message));
        messages
    }
}
