//! Provider trait: the abstraction over the optional reasoning service.
//!
//! A Provider knows how to send an ordered list of role-tagged messages to a
//! text-generation backend and get a single reply back. When no provider is
//! configured the reply generator answers locally instead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// Reply used when a successful response carries no recognizable text.
pub const NO_RESPONSE_PLACEHOLDER: &str = "I could not generate a response.";

/// A single reasoning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Model identifier, omitted from the wire when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Ordered conversation: system turns, history, final user turn
    pub messages: Vec<Message>,
}

/// Which upstream response shape produced the reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `choices[0].message.content`
    Choices,
    /// Flat `output` field
    Output,
    /// Neither field present; the placeholder was used
    Empty,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The reply text, never absent
    pub content: String,

    pub shape: ResponseShape,

    /// Which model actually responded, when the service says so
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ProviderResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            shape: ResponseShape::Choices,
            model: None,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            content: NO_RESPONSE_PLACEHOLDER.to_string(),
            shape: ResponseShape::Empty,
            model: None,
        }
    }
}

/// The core Provider trait.
///
/// The reply generator calls `complete()` without knowing which backend is
/// behind it, so tests can substitute a scripted provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider.
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_omitted_when_unset() {
        let req = ProviderRequest {
            model: None,
            messages: vec![Message::user("hi")],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn placeholder_response() {
        let resp = ProviderResponse::placeholder();
        assert_eq!(resp.content, NO_RESPONSE_PLACEHOLDER);
        assert_eq!(resp.shape, ResponseShape::Empty);
    }
}
