//! The structured-completion capability the workflow steps depend on.
//!
//! Steps only see [`StructuredModel`]: give it a system prompt, a user
//! message, and the expected [`OutputSchema`], get back a JSON object or an
//! explicit error. [`ProviderModel`] implements it over any
//! [`Provider`]; tests implement it with canned replies.

use std::sync::Arc;

use async_trait::async_trait;
use postcheck_llm::{ChatMessage, ChatRequest, Provider, ProviderRouter, ResponseFormat};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::ModelError;

/// A named JSON Schema a model reply must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Schema name sent with the request.
    pub name: &'static str,
    /// JSON Schema document.
    pub schema: Value,
}

fn string_field(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn level_field() -> Value {
    json!({
        "type": "string",
        "enum": ["safe", "warning", "danger"],
        "description": "Safety level of the post"
    })
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

impl OutputSchema {
    /// `{level, reason}` returned by the classifier.
    pub fn classification() -> Self {
        Self {
            name: "safety_classification",
            schema: object_schema(
                json!({
                    "level": level_field(),
                    "reason": string_field("Detailed explanation of why this level was chosen"),
                }),
                &["level", "reason"],
            ),
        }
    }

    /// `{suggestion, corrected_text}` returned by the corrector.
    pub fn correction() -> Self {
        Self {
            name: "safety_correction",
            schema: object_schema(
                json!({
                    "suggestion": string_field("Concrete advice for improving the post"),
                    "corrected_text": string_field("The post rewritten to be safe"),
                }),
                &["suggestion", "corrected_text"],
            ),
        }
    }

    /// `{level, reason, suggestion, corrected_text}` returned by the assessor.
    pub fn assessment() -> Self {
        Self {
            name: "safety_assessment",
            schema: object_schema(
                json!({
                    "level": level_field(),
                    "reason": string_field("Detailed explanation of why this level was chosen"),
                    "suggestion": string_field("Concrete advice for improving the post"),
                    "corrected_text": string_field("The post rewritten to be safe"),
                }),
                &["level", "reason", "suggestion", "corrected_text"],
            ),
        }
    }
}

/// Ask a model for output conforming to a schema.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Run one completion and return the reply as a JSON object.
    ///
    /// Implementations must not substitute defaults: a reply that is not a
    /// JSON object is an error. Field-level validation is left to the caller.
    async fn complete_structured(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &OutputSchema,
    ) -> Result<Value, ModelError>;
}

/// [`StructuredModel`] backed by a chat-completion [`Provider`].
#[derive(Clone)]
pub struct ProviderModel {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    max_tokens: Option<i32>,
}

impl ProviderModel {
    /// Use `model` (without routing prefix) on `provider`, at temperature 0.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Resolve a `prefix/model` identifier through a router.
    pub fn routed(router: &ProviderRouter, model_id: &str) -> Option<Self> {
        router
            .route(model_id)
            .map(|(provider, model)| Self::new(provider, model))
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap completion length.
    pub fn with_max_tokens(mut self, max_tokens: Option<i32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Bare model name sent to the provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Name of the provider serving this model.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

#[async_trait]
impl StructuredModel for ProviderModel {
    async fn complete_structured(
        &self,
        system_prompt: &str,
        user_message: &str,
        schema: &OutputSchema,
    ) -> Result<Value, ModelError> {
        let mut request = ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_message),
            ],
        )
        .with_temperature(self.temperature)
        .with_response_format(ResponseFormat::json_schema(schema.name, schema.schema.clone()));
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = self.provider.complete(&request).await?;

        if let Some(refusal) = response.first_refusal() {
            return Err(ModelError::Refused(refusal.to_string()));
        }

        let content = response
            .first_content()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ModelError::MalformedOutput("completion has no content".into()))?;

        debug!(
            provider = self.provider.name(),
            schema = schema.name,
            bytes = content.len(),
            "structured completion received"
        );

        postcheck_llm::extract_json_object(content)
            .map_err(|e| ModelError::MalformedOutput(e.to_string()))
    }
}

impl std::fmt::Debug for ProviderModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderModel")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
