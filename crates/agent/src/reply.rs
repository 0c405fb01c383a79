//! Reply generator: retrieval, context assembly, and the answer itself.

use std::sync::Arc;

use tracing::{debug, info};
use vocalis_core::agent::AgentProfile;
use vocalis_core::error::{Error, Result};
use vocalis_core::message::{ConversationTurn, Role};
use vocalis_core::provider::{Provider, ProviderRequest};
use vocalis_core::store::AgentStore;
use vocalis_memory::retrieval::{self, DEFAULT_TOP_K};

use crate::context::ContextAssembler;

/// A reply plus the knowledge chunks it was grounded on.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    pub reply: String,
    /// Retrieved chunk texts, most similar first
    pub sources: Vec<String>,
}

/// Produces replies for an agent, locally or through a reasoning service.
pub struct ReplyGenerator {
    store: Arc<dyn AgentStore>,
    provider: Option<Arc<dyn Provider>>,
    model: Option<String>,
    assembler: ContextAssembler,
    top_k: usize,
}

impl ReplyGenerator {
    /// A generator with no reasoning service: replies are the assembled context.
    pub fn new(store: Arc<dyn AgentStore>) -> Self {
        Self {
            store,
            provider: None,
            model: None,
            assembler: ContextAssembler::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Attach a reasoning service, switching to the configured path.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>, model: Option<String>) -> Self {
        self.provider = Some(provider);
        self.model = model;
        self
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Answer `message` as `agent`, grounded on its indexed knowledge.
    pub async fn generate(
        &self,
        agent: &AgentProfile,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<GeneratedReply> {
        if message.trim().is_empty() {
            return Err(Error::Validation("Message is required".into()));
        }
        // System turns come only from the agent itself.
        if history.iter().any(|turn| turn.role == Role::System) {
            return Err(Error::Validation(
                "History turns must have role user or assistant".into(),
            ));
        }

        let chunks = retrieval::retrieve(self.store.as_ref(), &agent.id, message, self.top_k).await?;
        let sources: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        debug!(agent_id = %agent.id, sources = sources.len(), "Knowledge retrieved");

        let Some(provider) = &self.provider else {
            let reply = self
                .assembler
                .fallback_context(agent, history, message, &chunks);
            return Ok(GeneratedReply { reply, sources });
        };

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: self
                .assembler
                .reasoning_messages(agent, history, message, &chunks),
        };

        info!(agent_id = %agent.id, provider = provider.name(), "Requesting reasoning reply");
        let response = provider.complete(request).await?;

        Ok(GeneratedReply {
            reply: response.content,
            sources,
        })
    }
}
