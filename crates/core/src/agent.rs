//! Agent configuration records.
//!
//! An agent bundles a persona prompt, a voice identity, and a pasted
//! knowledge corpus. [`AgentProfile`] is the public view of a stored record;
//! [`AgentDraft`] is the partial input accepted by `upsert`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// System prompt given to agents created without one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful voice assistant.";

/// A stored agent, without the registry's internal chunk cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    /// Opaque unique id, immutable once assigned
    pub id: String,

    /// Display label, never empty
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Voice identifier handed to the speech synthesizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    /// Where the operator's reference voice sample lives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_sample_url: Option<String>,

    pub system_prompt: String,

    /// Raw latest knowledge paste. Replaced wholesale, never merged.
    #[serde(default)]
    pub knowledge_base: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Partial agent configuration for create-or-update.
///
/// `name` is required; every other field falls back to the previous
/// record's value (or a default on first creation) when `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_sample_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<String>,
}

impl AgentDraft {
    /// Start a draft with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Target an existing (or to-be-created) id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_knowledge(mut self, knowledge: impl Into<String>) -> Self {
        self.knowledge_base = Some(knowledge.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    /// Reject drafts that must never reach the store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Name is required".into()));
        }
        Ok(())
    }
}

impl AgentProfile {
    /// Apply `draft` over `previous` (if any) and stamp `now`.
    ///
    /// Generates a UUID when the draft carries no id. `created_at` is kept
    /// from `previous`; `updated_at` is always `now`.
    pub fn merge(previous: Option<&AgentProfile>, draft: AgentDraft, now: DateTime<Utc>) -> Self {
        let id = draft
            .id
            .or_else(|| previous.map(|p| p.id.clone()))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            id,
            name: draft.name,
            description: draft
                .description
                .or_else(|| previous.map(|p| p.description.clone()))
                .unwrap_or_default(),
            voice_id: draft
                .voice_id
                .or_else(|| previous.and_then(|p| p.voice_id.clone())),
            voice_sample_url: draft
                .voice_sample_url
                .or_else(|| previous.and_then(|p| p.voice_sample_url.clone())),
            system_prompt: draft
                .system_prompt
                .or_else(|| previous.map(|p| p.system_prompt.clone()))
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            knowledge_base: draft
                .knowledge_base
                .or_else(|| previous.map(|p| p.knowledge_base.clone()))
                .unwrap_or_default(),
            created_at: previous.map(|p| p.created_at).unwrap_or(now),
            updated_at: now,
        }
    }
}
