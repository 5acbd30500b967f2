//! OpenAI-compatible provider implementation.
//!
//! [`OpenAiCompatProvider`] works with any API that follows the OpenAI chat
//! completion format and accepts the `json_schema` response format.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::LlmProviderConfig;
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

/// An LLM provider speaking the OpenAI chat completion API.
///
/// Point it at any compatible endpoint by changing `base_url` in the
/// [`LlmProviderConfig`]. Each provider owns one `reqwest::Client` whose
/// timeout comes from the config.
pub struct OpenAiCompatProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    /// Create a provider whose API key is read from `config.api_key_env`
    /// at request time.
    pub fn new(config: LlmProviderConfig) -> Self {
        let http = build_client(&config);
        Self {
            config,
            http,
            api_key: None,
        }
    }

    /// Create a provider with an explicit API key, bypassing the
    /// environment lookup.
    pub fn with_api_key(config: LlmProviderConfig, api_key: String) -> Self {
        let http = build_client(&config);
        Self {
            config,
            http,
            api_key: Some(api_key),
        }
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &LlmProviderConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Explicit key first, then the environment variable.
    fn resolve_api_key(&self) -> Result<String> {
        if let Some(ref key) = self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env).map_err(|_| {
            ProviderError::NotConfigured(format!("set {} env var", self.config.api_key_env))
        })
    }
}

fn build_client(config: &LlmProviderConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs()))
        .build()
        .unwrap_or_else(|e| {
            warn!(provider = %config.name, error = %e, "falling back to default http client");
            reqwest::Client::new()
        })
}

fn map_send_error(err: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            after_secs: timeout_secs,
        }
    } else {
        ProviderError::Http(err)
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let api_key = self.resolve_api_key()?;
        let url = self.completions_url();

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            structured = request.response_format.is_some(),
            "sending chat completion request"
        );

        let mut req = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json");

        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req
            .json(request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.config.timeout_secs()))?;
        let status = response.status();

        if !status.is_success() {
            if status.as_u16() == 429 {
                let header_ms = parse_retry_after_header(&response);
                let body = response.text().await.unwrap_or_default();

                // 429 is also used for exhausted credits, which no amount of
                // waiting will fix.
                if is_quota_exhausted(&body) {
                    let msg = extract_error_message(&body)
                        .unwrap_or_else(|| "credits exhausted or spending limit reached".into());
                    warn!(provider = %self.config.name, "quota exhausted");
                    return Err(ProviderError::RequestFailed(msg));
                }

                let retry_ms = header_ms
                    .or_else(|| parse_retry_after_ms(&body))
                    .unwrap_or(1000);
                warn!(
                    provider = %self.config.name,
                    retry_after_ms = retry_ms,
                    "rate limited"
                );
                return Err(ProviderError::RateLimited {
                    retry_after_ms: retry_ms,
                });
            }

            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthFailed(
                    extract_error_message(&body).unwrap_or(body),
                ));
            }

            if status.as_u16() == 404 {
                return Err(ProviderError::ModelNotFound(format!(
                    "model '{}': {}",
                    request.model, body
                )));
            }

            return Err(ProviderError::RequestFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    after_secs: self.config.timeout_secs(),
                }
            } else {
                ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
            }
        })?;

        debug!(
            provider = %self.config.name,
            model = %chat_response.model,
            choices = chat_response.choices.len(),
            total_tokens = chat_response.usage.as_ref().map(|u| u.total_tokens),
            "chat completion response received"
        );

        Ok(chat_response)
    }
}

fn is_quota_exhausted(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("exhausted")
        || lower.contains("spending limit")
        || lower.contains("credits")
        || lower.contains("billing")
        || lower.contains("quota exceeded")
        || lower.contains("insufficient_quota")
}

/// Pull `error.message` (or a bare `error` string) out of a JSON error body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| {
        v.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .or_else(|| v.as_str().map(String::from))
    })
}

/// Numeric `Retry-After` seconds only; HTTP-date values are ignored.
fn parse_retry_after_header(response: &reqwest::Response) -> Option<u64> {
    let header_val = response
        .headers()
        .get("retry-after")
        .or_else(|| response.headers().get("x-ratelimit-reset-after"))
        .and_then(|v| v.to_str().ok())?;

    header_val
        .parse::<f64>()
        .ok()
        .map(|secs| (secs * 1000.0).max(0.0) as u64)
}

fn parse_retry_after_ms(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("retry_after_ms")
        .and_then(|v| v.as_u64())
        .or_else(|| {
            value
                .get("retry_after")
                .and_then(|v| v.as_f64())
                .map(|secs| (secs * 1000.0) as u64)
        })
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
