//! The chat service: agent lifecycle plus one chat turn end to end.

use std::sync::Arc;

use tracing::{debug, info, warn};
use vocalis_config::AppConfig;
use vocalis_core::agent::{AgentDraft, AgentProfile};
use vocalis_core::error::{Error, Result};
use vocalis_core::message::ConversationTurn;
use vocalis_core::speech::SpeechSynthesizer;
use vocalis_core::store::AgentStore;
use vocalis_memory::InMemoryAgentStore;
use vocalis_providers::{ElevenLabsSynthesizer, ReasoningClient};

use crate::context::ContextAssembler;
use crate::reply::ReplyGenerator;

/// Everything produced for one chat turn.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub sources: Vec<String>,
    /// Encoded speech for `reply`, absent when synthesis is off or failed
    pub audio: Option<Vec<u8>>,
}

/// Agent registry operations and chat, shared by every front end.
pub struct AgentService {
    store: Arc<dyn AgentStore>,
    generator: ReplyGenerator,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

impl AgentService {
    pub fn new(store: Arc<dyn AgentStore>, generator: ReplyGenerator) -> Self {
        Self {
            store,
            generator,
            synthesizer: None,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Wire an in-memory registry and whichever remote services are configured.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn AgentStore> = Arc::new(InMemoryAgentStore::new());

        let mut generator = ReplyGenerator::new(store.clone())
            .with_top_k(config.retrieval.top_k)
            .with_assembler(ContextAssembler::new(config.retrieval.history_window));

        match ReasoningClient::from_config(&config.reasoning)? {
            Some(client) => {
                info!(endpoint = client.endpoint(), "Reasoning service configured");
                generator = generator.with_provider(Arc::new(client), config.reasoning.model.clone());
            }
            None => info!("No reasoning service configured, replies use local context"),
        }

        let mut service = Self::new(store, generator);
        if config.speech.is_configured() {
            let synthesizer = ElevenLabsSynthesizer::new(&config.speech)?;
            service = service.with_synthesizer(Arc::new(synthesizer));
        } else {
            info!("Speech synthesis disabled, replies carry no audio");
        }

        Ok(service)
    }

    pub fn store(&self) -> &Arc<dyn AgentStore> {
        &self.store
    }

    pub fn reasoning_configured(&self) -> bool {
        self.generator.is_configured()
    }

    pub fn speech_configured(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Create or update an agent. The store re-indexes supplied knowledge
    /// within the same write as the profile.
    pub async fn save_agent(&self, draft: AgentDraft) -> Result<AgentProfile> {
        draft.validate()?;
        Ok(self.store.upsert(draft).await?)
    }

    pub async fn get_agent(&self, id: &str) -> Result<AgentProfile> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::agent_not_found(id))
    }

    pub async fn list_agents(&self) -> Result<Vec<AgentProfile>> {
        Ok(self.store.list().await?)
    }

    /// Returns `false` when no agent had that id.
    pub async fn delete_agent(&self, id: &str) -> Result<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(agent_id = id, "Agent deleted");
        }
        Ok(deleted)
    }

    /// Run one chat turn: reply, sources, and best-effort audio.
    pub async fn chat(
        &self,
        agent_id: &str,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatOutcome> {
        let agent = self.get_agent(agent_id).await?;
        if message.trim().is_empty() {
            return Err(Error::Validation("Message is required".into()));
        }

        let generated = self.generator.generate(&agent, history, message).await?;

        let audio = match &self.synthesizer {
            Some(synthesizer) => match synthesizer
                .synthesize(&generated.reply, agent.voice_id.as_deref())
                .await
            {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(agent_id, error = %e, "Failed to generate speech audio");
                    None
                }
            },
            None => None,
        };

        debug!(
            agent_id,
            sources = generated.sources.len(),
            audio = audio.is_some(),
            "Chat turn complete"
        );

        Ok(ChatOutcome {
            reply: generated.reply,
            sources: generated.sources,
            audio,
        })
    }
}
