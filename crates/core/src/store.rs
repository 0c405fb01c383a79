//! Agent store trait: the registry of agent configurations.
//!
//! Each stored record owns a derived cache of knowledge chunks. The cache is
//! always what the indexer would produce from the record's `knowledge_base`
//! at the time `index` was last called; it is never a source of truth.
//! Callers that replace knowledge text must call `index` afterwards, or the
//! cache goes stale.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::{AgentDraft, AgentProfile};
use crate::error::StoreError;

/// A knowledge chunk scored against a query. Produced per query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The literal chunk text, also used as the citation
    pub text: String,

    /// Jaccard similarity in `[0, 1]`
    pub score: f32,
}

/// The core AgentStore trait.
///
/// Implementations: in-memory. The trait exists so a durable backend can
/// replace it without touching the retrieval or reply code.
#[async_trait]
pub trait AgentStore: Send + Sync {
    /// The backend name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Create or update an agent. The draft must already be validated.
    ///
    /// When the draft carries knowledge, the chunk cache is rebuilt in the
    /// same record replacement; otherwise the existing cache is kept.
    async fn upsert(&self, draft: AgentDraft) -> Result<AgentProfile, StoreError>;

    /// Get an agent by id.
    async fn get(&self, id: &str) -> Result<Option<AgentProfile>, StoreError>;

    /// List all agents in insertion order.
    async fn list(&self) -> Result<Vec<AgentProfile>, StoreError>;

    /// Delete an agent. `Ok(false)` when the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Rebuild the agent's chunk cache from `raw_text`.
    ///
    /// Returns `Ok(false)` without creating anything when the id is unknown.
    async fn index(&self, id: &str, raw_text: &str) -> Result<bool, StoreError>;

    /// The agent's indexed chunks, or `None` for an unknown id.
    async fn chunks(&self, id: &str) -> Result<Option<Vec<String>>, StoreError>;

    /// Get total agent count.
    async fn count(&self) -> Result<usize, StoreError>;
}
