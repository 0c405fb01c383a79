//! # Vocalis Core
//!
//! Domain types, traits, and error definitions for the Vocalis voice agent
//! runtime. This crate has **no framework dependencies**: it defines the
//! domain model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external seam is a trait here. Implementations live in their
//! respective crates:
//! - [`AgentStore`]: the agent registry (in-memory today, durable later)
//! - [`Provider`]: the optional reasoning service
//! - [`SpeechSynthesizer`]: the optional text-to-speech service

pub mod agent;
pub mod error;
pub mod message;
pub mod provider;
pub mod speech;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentDraft, AgentProfile, DEFAULT_SYSTEM_PROMPT};
pub use error::{Error, ErrorCategory, Result};
pub use message::{ConversationTurn, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use speech::SpeechSynthesizer;
pub use store::{AgentStore, RetrievedChunk};
