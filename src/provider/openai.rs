// src/provider/openai.rs — OpenAI Responses API provider

use async_trait::async_trait;
use std::time::Duration;

use super::{ChatRequest, ChatResponse, ModelProvider, TokenUsage};
use crate::infra::config::ModelConfig;
use crate::infra::errors::ParableError;

pub struct OpenAIProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAIProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, ParableError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ParableError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Build from config, reading the key from the configured env var.
    /// A missing or blank key is fatal: nothing can be answered without it.
    pub fn from_env(config: &ModelConfig) -> Result<Self, ParableError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ParableError::NoProvider {
                env_var: config.api_key_env.clone(),
            })?;
        Self::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn provider_error(&self, message: String) -> ParableError {
        ParableError::Provider {
            provider: "openai".into(),
            message,
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ParableError> {
        let input: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            })
            .collect();

        let body = serde_json::json!({
            "model": request.model,
            "input": input,
        });

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ParableError::Timeout {
                        provider: "openai".into(),
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    self.provider_error(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ParableError::RateLimited {
                provider: "openai".into(),
                retry_after_ms: retry_after_ms(response.headers()),
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.provider_error(format!("HTTP {}: {}", status, error_body)));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| self.provider_error(format!("Failed to parse response: {}", e)))?;

        if let Some(message) = resp["error"]["message"].as_str() {
            return Err(self.provider_error(message.to_string()));
        }

        let usage = TokenUsage {
            input_tokens: resp["usage"]["input_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: resp["usage"]["output_tokens"].as_u64().unwrap_or(0) as u32,
        };

        Ok(ChatResponse {
            content: extract_output_text(&resp),
            usage,
        })
    }
}

/// Pull the answer text out of a Responses API body.
///
/// Prefers the aggregated `output_text` field; otherwise joins every
/// `output_text` content part of every output item. No text at all is `""`.
pub fn extract_output_text(resp: &serde_json::Value) -> String {
    if let Some(text) = resp["output_text"].as_str() {
        return text.to_string();
    }

    let mut text = String::new();
    for item in resp["output"].as_array().into_iter().flatten() {
        for part in item["content"].as_array().into_iter().flatten() {
            if part["type"].as_str() == Some("output_text") {
                if let Some(t) = part["text"].as_str() {
                    text.push_str(t);
                }
            }
        }
    }
    text
}

fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000)
        .unwrap_or(5000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    /// Local stand-in for the Responses API. The path prefix picks the reply.
    async fn spawn_stub() -> String {
        let app = Router::new()
            .route("/ok/responses", post(answer))
            .route(
                "/limited/responses",
                post(|| async {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        [(header::RETRY_AFTER, "2")],
                        "slow down",
                    )
                }),
            )
            .route(
                "/denied/responses",
                post(|| async {
                    (
                        StatusCode::UNAUTHORIZED,
                        r#"{"error":{"message":"Incorrect API key provided"}}"#,
                    )
                }),
            )
            .route("/garbage/responses", post(|| async { "not json" }))
            .route(
                "/rejected/responses",
                post(|| async { Json(json!({"error": {"message": "model not found"}})) }),
            )
            .route(
                "/slow/responses",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    "{}"
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Well-formed reply without `output_text`. Reports the number of input
    /// messages it received as `input_tokens`.
    async fn answer(
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> axum::response::Response {
        let auth = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
        if auth != Some("Bearer sk-test") || body["model"] != "gpt-4.1-mini" {
            return StatusCode::BAD_REQUEST.into_response();
        }
        let inputs = body["input"].as_array().map_or(0, |a| a.len());
        Json(json!({
            "output": [
                {"type": "message", "content": [{"type": "output_text", "text": "Restart."}]}
            ],
            "usage": {"input_tokens": inputs, "output_tokens": 3}
        }))
        .into_response()
    }

    fn provider(base_url: String) -> OpenAIProvider {
        OpenAIProvider::new("sk-test".into(), base_url, Duration::from_secs(1)).unwrap()
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4.1-mini".into(),
            messages: vec![Message::system("Be brief."), Message::user("My phone is slow")],
        }
    }

    #[tokio::test]
    async fn test_chat_joins_output_parts() {
        let base = spawn_stub().await;
        let resp = provider(format!("{base}/ok/")).chat(request()).await.unwrap();
        assert_eq!(resp.content, "Restart.");
        assert_eq!(resp.usage.input_tokens, 2);
        assert_eq!(resp.usage.output_tokens, 3);
    }

    #[tokio::test]
    async fn test_chat_rate_limit_reads_retry_after() {
        let base = spawn_stub().await;
        let err = provider(format!("{base}/limited")).chat(request()).await.unwrap_err();
        assert!(matches!(
            err,
            ParableError::RateLimited {
                retry_after_ms: 2000,
                ..
            }
        ));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_chat_http_error_is_provider_error() {
        let base = spawn_stub().await;
        let err = provider(format!("{base}/denied")).chat(request()).await.unwrap_err();
        match &err {
            ParableError::Provider { message, .. } => {
                assert!(message.starts_with("HTTP 401"), "{message}");
                assert!(message.contains("Incorrect API key provided"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_chat_unparsable_body_is_provider_error() {
        let base = spawn_stub().await;
        let err = provider(format!("{base}/garbage")).chat(request()).await.unwrap_err();
        match &err {
            ParableError::Provider { message, .. } => {
                assert!(message.starts_with("Failed to parse response"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_chat_error_object_in_success_body() {
        let base = spawn_stub().await;
        let err = provider(format!("{base}/rejected")).chat(request()).await.unwrap_err();
        match &err {
            ParableError::Provider { message, .. } => assert_eq!(message, "model not found"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_chat_slow_upstream_times_out() {
        let base = spawn_stub().await;
        let err = provider(format!("{base}/slow")).chat(request()).await.unwrap_err();
        assert!(matches!(err, ParableError::Timeout { seconds: 1, .. }));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_chat_connection_refused_is_provider_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(format!("http://{addr}")).chat(request()).await.unwrap_err();
        assert!(matches!(err, ParableError::Provider { .. }));
        assert!(err.is_upstream());
    }

    #[test]
    fn test_extract_prefers_output_text() {
        let resp = json!({
            "output_text": "Restart the phone.",
            "output": [{"content": [{"type": "output_text", "text": "ignored"}]}]
        });
        assert_eq!(extract_output_text(&resp), "Restart the phone.");
    }

    #[test]
    fn test_extract_joins_output_parts() {
        let resp = json!({
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "Open Settings.\n"},
                    {"type": "refusal", "refusal": "no"},
                    {"type": "output_text", "text": "Did that work?"}
                ]}
            ]
        });
        assert_eq!(extract_output_text(&resp), "Open Settings.\nDid that work?");
    }

    #[test]
    fn test_extract_missing_text_is_empty() {
        assert_eq!(extract_output_text(&json!({})), "");
        assert_eq!(extract_output_text(&json!({"output": []})), "");
    }

    #[test]
    fn test_from_env_missing_key_fails_fast() {
        let config = ModelConfig {
            api_key_env: "PARABLE_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..ModelConfig::default()
        };
        let err = OpenAIProvider::from_env(&config).err().unwrap();
        assert!(matches!(err, ParableError::NoProvider { .. }));
    }

    #[test]
    fn test_from_env_blank_key_fails_fast() {
        std::env::set_var("PARABLE_TEST_BLANK_KEY", "   ");
        let config = ModelConfig {
            api_key_env: "PARABLE_TEST_BLANK_KEY".into(),
            ..ModelConfig::default()
        };
        assert!(OpenAIProvider::from_env(&config).is_err());
    }

    #[test]
    fn test_from_env_with_key() {
        std::env::set_var("PARABLE_TEST_PRESENT_KEY", "sk-test");
        let config = ModelConfig {
            api_key_env: "PARABLE_TEST_PRESENT_KEY".into(),
            base_url: "http://localhost:4000/v1/".into(),
            ..ModelConfig::default()
        };
        let provider = OpenAIProvider::from_env(&config).unwrap();
        assert_eq!(provider.id(), "openai");
        assert_eq!(provider.base_url, "http://localhost:4000/v1");
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), 5000);
        headers.insert(reqwest::header::RETRY_AFTER, "3".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), 3000);
    }
}
