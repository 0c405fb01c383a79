//! In-memory agent registry. Records live for the lifetime of the process.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use vocalis_core::agent::{AgentDraft, AgentProfile};
use vocalis_core::error::StoreError;
use vocalis_core::store::AgentStore;

use crate::indexer::split_paragraphs;

/// A stored agent plus its derived chunk cache.
#[derive(Debug, Clone)]
struct AgentRecord {
    profile: AgentProfile,
    chunks: Vec<String>,
}

#[derive(Default)]
struct Registry {
    records: HashMap<String, AgentRecord>,
    /// Ids in first-insertion order, for stable listing
    order: Vec<String>,
}

/// An in-memory agent store keyed by agent id.
///
/// Every write replaces a whole record under the write lock, so readers
/// never observe a partially updated agent.
pub struct InMemoryAgentStore {
    inner: Arc<RwLock<Registry>>,
}

impl InMemoryAgentStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Registry::default())),
        }
    }
}

impl Default for InMemoryAgentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentStore for InMemoryAgentStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn upsert(&self, draft: AgentDraft) -> Result<AgentProfile, StoreError> {
        // New knowledge is split here so text and chunks land in one replacement.
        let fresh_chunks = draft.knowledge_base.as_deref().map(split_paragraphs);

        let mut registry = self.inner.write().await;

        let previous = draft
            .id
            .as_deref()
            .and_then(|id| registry.records.get(id));
        let profile = AgentProfile::merge(previous.map(|r| &r.profile), draft, Utc::now());
        let chunks = match fresh_chunks {
            Some(chunks) => chunks,
            None => previous.map(|r| r.chunks.clone()).unwrap_or_default(),
        };

        let id = profile.id.clone();
        let created = !registry.records.contains_key(&id);
        registry.records.insert(
            id.clone(),
            AgentRecord {
                profile: profile.clone(),
                chunks,
            },
        );
        if created {
            registry.order.push(id.clone());
        }

        tracing::debug!(agent_id = %id, created, "Agent saved");
        Ok(profile)
    }

    async fn get(&self, id: &str) -> Result<Option<AgentProfile>, StoreError> {
        let registry = self.inner.read().await;
        Ok(registry.records.get(id).map(|r| r.profile.clone()))
    }

    async fn list(&self) -> Result<Vec<AgentProfile>, StoreError> {
        let registry = self.inner.read().await;
        Ok(registry
            .order
            .iter()
            .filter_map(|id| registry.records.get(id))
            .map(|r| r.profile.clone())
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut registry = self.inner.write().await;
        if registry.records.remove(id).is_none() {
            return Ok(false);
        }
        registry.order.retain(|existing| existing != id);
        tracing::debug!(agent_id = id, "Agent deleted");
        Ok(true)
    }

    async fn index(&self, id: &str, raw_text: &str) -> Result<bool, StoreError> {
        // Split outside the lock; the text may be large.
        let chunks = split_paragraphs(raw_text);

        let mut registry = self.inner.write().await;
        let Some(existing) = registry.records.get(id) else {
            tracing::debug!(agent_id = id, "Skipping index for unknown agent");
            return Ok(false);
        };

        let mut profile = existing.profile.clone();
        profile.updated_at = Utc::now();
        let count = chunks.len();
        registry
            .records
            .insert(id.to_string(), AgentRecord { profile, chunks });

        tracing::debug!(agent_id = id, chunks = count, "Knowledge indexed");
        Ok(true)
    }

    async fn chunks(&self, id: &str) -> Result<Option<Vec<String>>, StoreError> {
        let registry = self.inner.read().await;
        Ok(registry.records.get(id).map(|r| r.chunks.clone()))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.records.len())
    }
}
