//! Scripted stand-ins for the remote services.

use std::sync::Mutex;

use vocalis_core::error::{ProviderError, SpeechError};
use vocalis_core::provider::{Provider, ProviderRequest, ProviderResponse};
use vocalis_core::speech::SpeechSynthesizer;

/// A mock provider that replays scripted results and records every request.
pub struct ScriptedProvider {
    responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn single_text(text: &str) -> Self {
        Self::new(vec![Ok(ProviderResponse::text(text))])
    }

    pub fn failing(status_code: u16) -> Self {
        Self::new(vec![Err(ProviderError::ApiError {
            status_code,
            message: "Service Unavailable".into(),
        })])
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            panic!("ScriptedProvider: no more responses");
        }
        responses.remove(0)
    }
}

/// A synthesizer that returns the reply text as "audio", or always fails.
pub struct EchoSynthesizer {
    fail: bool,
    voices: Mutex<Vec<Option<String>>>,
}

impl EchoSynthesizer {
    pub fn working() -> Self {
        Self {
            fail: false,
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn broken() -> Self {
        Self {
            fail: true,
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn voices(&self) -> Vec<Option<String>> {
        self.voices.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for EchoSynthesizer {
    fn name(&self) -> &str {
        "echo"
    }

    async fn synthesize(&self, text: &str, voice_id: Option<&str>) -> Result<Vec<u8>, SpeechError> {
        self.voices.lock().unwrap().push(voice_id.map(str::to_string));
        if self.fail {
            return Err(SpeechError::ApiError {
                status_code: 401,
                message: "Unauthorized".into(),
            });
        }
        Ok(text.as_bytes().to_vec())
    }
}
