//! Conversation orchestration — the heart of MINA.
//!
//! Every turn follows a **Record → Route → Record** cycle:
//!
//! 1. **Receive** a user message (from the CLI or the gateway)
//! 2. **Knowledge lookup** — known questions are answered locally,
//!    instantly and for free
//! 3. **Context assembly** on a miss: personality prompt + a bounded
//!    window of recent history + the current message
//! 4. **Completion call** through the configured backend
//! 5. **Record** the outcome in the session log, error text included
//!
//! The session log is owned by the calling shell; the router and builder
//! hold no per-session state.

pub mod context;
pub mod router;

pub use context::{ContextBuilder, HISTORY_WINDOW};
pub use router::{KNOWLEDGE_ATTRIBUTION, Reply, ReplySource, ResponseRouter};
