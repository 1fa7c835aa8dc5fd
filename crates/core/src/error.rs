//! Error types for the completion path.
//!
//! Uses `thiserror` for ergonomic error definitions. Exactly four categories
//! exist, and every transport condition the client can hit maps onto one of
//! them. None of these is fatal to a session: the router converts each into
//! a user-facing answer and the conversation continues.

use thiserror::Error;

/// Failure categories of a completion call.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// No credential is available. Nothing was sent over the network.
    #[error("API key is not configured")]
    NotConfigured,

    /// The request exceeded the configured wait bound and was abandoned.
    #[error("request timed out")]
    Timeout,

    /// The endpoint could not be reached or answered with a failure status.
    #[error("connection error: {0}")]
    Connection(String),

    /// Anything else: malformed response body, missing fields, and the like.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}
