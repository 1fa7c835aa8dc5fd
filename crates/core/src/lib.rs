//! # MINA Core
//!
//! Domain types, traits, and error definitions for the MINA assistant.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The session log is an explicitly passed, shell-owned value: whoever runs
//! a session (the REPL, the web gateway, a test) creates its
//! [`ConversationLog`], hands it to the router each turn, and clears it on
//! request. The remote completion service hides behind the
//! [`CompletionClient`] trait so that routing logic never knows which
//! backend answers — or whether it is a scripted test double.

pub mod client;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod personality;

// Re-export key types at crate root for ergonomics
pub use client::{CompletionClient, CompletionRequest};
pub use error::CompletionError;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use message::{ConversationLog, Message, PromptMessage, Role};
pub use personality::{ASSISTANT_NAME, Personality};
