//! Speech synthesis trait.
//!
//! Turning a reply into audio is a secondary result channel: a failure here
//! must never fail the chat reply it belongs to. Callers treat an `Err` as
//! "no audio".

use async_trait::async_trait;

use crate::error::SpeechError;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// The backend name (e.g., "elevenlabs").
    fn name(&self) -> &str;

    /// Render `text` with the given voice (or the backend default) and
    /// return the raw encoded audio bytes.
    async fn synthesize(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> std::result::Result<Vec<u8>, SpeechError>;
}
