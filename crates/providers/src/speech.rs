//! ElevenLabs text-to-speech client.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use vocalis_config::{SpeechConfig, VoiceSettings};
use vocalis_core::error::SpeechError;
use vocalis_core::speech::SpeechSynthesizer;

/// Renders reply text to audio through the ElevenLabs API.
///
/// Construction never fails for missing credentials; each call reports
/// `NotConfigured` instead, so the chat path can carry on without audio.
pub struct ElevenLabsSynthesizer {
    base_url: String,
    api_key: Option<String>,
    default_voice_id: Option<String>,
    model_id: String,
    voice_settings: Option<VoiceSettings>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_settings: Option<&'a VoiceSettings>,
}

impl ElevenLabsSynthesizer {
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SpeechError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            default_voice_id: config.default_voice_id.clone(),
            model_id: config.model_id.clone(),
            voice_settings: config.voice_settings,
            client,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(
        &self,
        text: &str,
        voice_id: Option<&str>,
    ) -> std::result::Result<Vec<u8>, SpeechError> {
        let Some(api_key) = &self.api_key else {
            return Err(SpeechError::NotConfigured(
                "ELEVENLABS_API_KEY is not configured".into(),
            ));
        };

        let Some(voice) = voice_id
            .filter(|v| !v.is_empty())
            .or(self.default_voice_id.as_deref())
        else {
            return Err(SpeechError::NotConfigured(
                "no voice id provided and no default voice configured".into(),
            ));
        };

        let url = format!("{}/text-to-speech/{}", self.base_url, voice);
        debug!(voice, model = %self.model_id, chars = text.len(), "Requesting speech synthesis");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
                voice_settings: self.voice_settings.as_ref(),
            })
            .send()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("unknown").to_string();
            warn!(status = status.as_u16(), "Speech synthesis failed");
            return Err(SpeechError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Network(e.to_string()))?;
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    fn config(base_url: &str) -> SpeechConfig {
        SpeechConfig {
            api_key: Some("xi-test".into()),
            default_voice_id: Some("default-voice".into()),
            base_url: base_url.into(),
            ..SpeechConfig::default()
        }
    }

    fn echo_app() -> Router {
        Router::new().route(
            "/text-to-speech/{voice}",
            post(
                |Path(voice): Path<String>,
                 headers: HeaderMap,
                 Json(body): Json<serde_json::Value>| async move {
                    let key = headers
                        .get("xi-api-key")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("none");
                    format!(
                        "{}|{}|{}|{}|{}",
                        voice,
                        key,
                        body["text"].as_str().unwrap_or("-"),
                        body["model_id"].as_str().unwrap_or("-"),
                        body["voice_settings"]["stability"],
                    )
                },
            ),
        )
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let synth = ElevenLabsSynthesizer::new(&SpeechConfig::default()).unwrap();
        let err = synth.synthesize("hi", Some("v")).await.unwrap_err();
        assert!(matches!(err, SpeechError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn missing_voice_is_not_configured() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.default_voice_id = None;
        let synth = ElevenLabsSynthesizer::new(&cfg).unwrap();
        let err = synth.synthesize("hi", None).await.unwrap_err();
        assert!(matches!(err, SpeechError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn posts_text_with_agent_voice() {
        let base = test_server::spawn(echo_app()).await;
        let synth = ElevenLabsSynthesizer::new(&config(&base)).unwrap();

        let audio = synth.synthesize("Hello there", Some("agent-voice")).await.unwrap();
        assert_eq!(
            String::from_utf8(audio).unwrap(),
            "agent-voice|xi-test|Hello there|eleven_monolingual_v1|null"
        );
    }

    #[tokio::test]
    async fn falls_back_to_default_voice_and_sends_settings() {
        let base = test_server::spawn(echo_app()).await;
        let mut cfg = config(&base);
        cfg.voice_settings = Some(VoiceSettings {
            stability: 0.5,
            similarity_boost: 0.75,
        });
        let synth = ElevenLabsSynthesizer::new(&cfg).unwrap();

        let audio = synth.synthesize("Hi", None).await.unwrap();
        assert_eq!(
            String::from_utf8(audio).unwrap(),
            "default-voice|xi-test|Hi|eleven_monolingual_v1|0.5"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let app = Router::new().route(
            "/text-to-speech/{voice}",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let base = test_server::spawn(app).await;
        let synth = ElevenLabsSynthesizer::new(&config(&base)).unwrap();

        let err = synth.synthesize("Hi", None).await.unwrap_err();
        assert!(matches!(err, SpeechError::ApiError { status_code: 401, .. }));
    }
}
