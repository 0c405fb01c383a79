//! Reasoning service client.
//!
//! Speaks the common chat-completions shape: POST `{model?, messages}` to a
//! single configured endpoint. Two reply shapes are accepted, checked in
//! order:
//! - `choices[0].message.content` (OpenAI-compatible services)
//! - a flat `output` string (simple generation servers)
//!
//! A success response with neither yields a fixed placeholder reply.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use vocalis_config::ReasoningConfig;
use vocalis_core::error::ProviderError;
use vocalis_core::provider::{
    NO_RESPONSE_PLACEHOLDER, Provider, ProviderRequest, ProviderResponse, ResponseShape,
};

/// HTTP client for the remote reasoning service.
pub struct ReasoningClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ReasoningClient {
    /// Create a client posting to `endpoint` verbatim.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    /// Build a client from configuration, or `None` when no endpoint is set.
    pub fn from_config(config: &ReasoningConfig) -> Result<Option<Self>, ProviderError> {
        if !config.is_configured() {
            return Ok(None);
        }
        let Some(endpoint) = config.api_url.clone() else {
            return Ok(None);
        };
        Self::new(
            endpoint,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Provider for ReasoningClient {
    fn name(&self) -> &str {
        "reasoning"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        debug!(
            endpoint = %self.endpoint,
            model = request.model.as_deref().unwrap_or("default"),
            messages = request.messages.len(),
            "Sending reasoning request"
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_body, "Reasoning service returned error");
            let message = match status.canonical_reason() {
                Some(reason) if error_body.is_empty() => reason.to_string(),
                _ => error_body,
            };
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        parse_completion(&body)
    }
}

/// Accepted response body. Every field is optional; unknown fields ignored.
#[derive(Debug, Default, Deserialize)]
struct CompletionPayload {
    #[serde(default)]
    choices: Option<Vec<ApiChoice>>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: Option<ApiChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the reply text from a success body.
fn parse_completion(body: &str) -> Result<ProviderResponse, ProviderError> {
    let payload: CompletionPayload = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

    let from_choices = payload
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    let (content, shape) = match (from_choices, payload.output) {
        (Some(content), _) => (content, ResponseShape::Choices),
        (None, Some(output)) => (output, ResponseShape::Output),
        (None, None) => (NO_RESPONSE_PLACEHOLDER.to_string(), ResponseShape::Empty),
    };

    Ok(ProviderResponse {
        content,
        shape,
        model: payload.model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use vocalis_core::Message;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: Some("tiny".into()),
            messages: vec![Message::system("Be brief."), Message::user("Hello")],
        }
    }

    #[test]
    fn parses_choices_shape() {
        let resp =
            parse_completion(r#"{"choices":[{"message":{"content":"Hi there"}}],"model":"m1"}"#)
                .unwrap();
        assert_eq!(resp.content, "Hi there");
        assert_eq!(resp.shape, ResponseShape::Choices);
        assert_eq!(resp.model.as_deref(), Some("m1"));
    }

    #[test]
    fn parses_output_shape() {
        let resp = parse_completion(r#"{"output":"Flat reply"}"#).unwrap();
        assert_eq!(resp.content, "Flat reply");
        assert_eq!(resp.shape, ResponseShape::Output);
    }

    #[test]
    fn choices_take_precedence_over_output() {
        let resp = parse_completion(
            r#"{"choices":[{"message":{"content":"from choices"}}],"output":"from output"}"#,
        )
        .unwrap();
        assert_eq!(resp.content, "from choices");
    }

    #[test]
    fn empty_choices_fall_through_to_output() {
        let resp = parse_completion(r#"{"choices":[],"output":"fallback"}"#).unwrap();
        assert_eq!(resp.content, "fallback");
        assert_eq!(resp.shape, ResponseShape::Output);
    }

    #[test]
    fn unrecognized_shape_uses_placeholder() {
        let resp = parse_completion(r#"{"something":"else"}"#).unwrap();
        assert_eq!(resp.content, NO_RESPONSE_PLACEHOLDER);
        assert_eq!(resp.shape, ResponseShape::Empty);

        let resp = parse_completion(r#"{"choices":[{"message":{}}]}"#).unwrap();
        assert_eq!(resp.content, NO_RESPONSE_PLACEHOLDER);
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        let err = parse_completion("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn from_config_without_url_is_none() {
        let config = ReasoningConfig::default();
        assert!(ReasoningClient::from_config(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn sends_messages_and_bearer_token() {
        let app = Router::new().route(
            "/v1/chat",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("none")
                    .to_string();
                let summary = format!(
                    "{}|{}|{}|{}",
                    auth,
                    body["model"].as_str().unwrap_or("-"),
                    body["messages"].as_array().map(|m| m.len()).unwrap_or(0),
                    body["messages"][1]["role"].as_str().unwrap_or("-"),
                );
                Json(serde_json::json!({ "choices": [{ "message": { "content": summary } }] }))
            }),
        );
        let base = test_server::spawn(app).await;

        let client = ReasoningClient::new(
            format!("{base}/v1/chat"),
            Some("sk-test".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        let resp = client.complete(request()).await.unwrap();

        assert_eq!(resp.content, "Bearer sk-test|tiny|2|user");
    }

    #[tokio::test]
    async fn omits_authorization_without_key() {
        let app = Router::new().route(
            "/generate",
            post(|headers: HeaderMap| async move {
                let has_auth = headers.contains_key("authorization");
                Json(serde_json::json!({ "output": format!("auth={has_auth}") }))
            }),
        );
        let base = test_server::spawn(app).await;

        let client =
            ReasoningClient::new(format!("{base}/generate"), None, Duration::from_secs(5)).unwrap();
        let resp = client.complete(request()).await.unwrap();
        assert_eq!(resp.content, "auth=false");
        assert_eq!(resp.shape, ResponseShape::Output);
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let app = Router::new().route(
            "/generate",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let base = test_server::spawn(app).await;

        let client =
            ReasoningClient::new(format!("{base}/generate"), None, Duration::from_secs(5)).unwrap();
        let err = client.complete(request()).await.unwrap_err();

        assert_eq!(err.status_code(), Some(503));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            ReasoningClient::new(format!("http://{addr}/x"), None, Duration::from_secs(2)).unwrap();
        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
