//! Request and response types for chat completion calls.
//!
//! These mirror the OpenAI chat completion format, including the
//! `response_format` extension used to request schema-constrained output.

use serde::{Deserialize, Serialize};

/// A message sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author ("system", "user", "assistant").
    pub role: String,

    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Constrains the shape of the model's reply.
///
/// Serializes to the OpenAI form:
/// `{"type": "json_schema", "json_schema": {"name": ..., "strict": true, "schema": {...}}}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Output that must validate against the given JSON Schema.
    JsonSchema {
        /// Schema name and body.
        json_schema: JsonSchemaSpec,
    },
}

impl ResponseFormat {
    /// Build a strict `json_schema` response format.
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self::JsonSchema {
            json_schema: JsonSchemaSpec {
                name: name.into(),
                strict: true,
                schema,
            },
        }
    }
}

/// The named schema inside a [`ResponseFormat::JsonSchema`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonSchemaSpec {
    /// Identifier for the schema (letters, digits, `_` and `-`).
    pub name: String,

    /// Whether the provider must enforce the schema exactly.
    pub strict: bool,

    /// The JSON Schema document.
    pub schema: serde_json::Value,
}

/// A chat completion request sent to an LLM provider.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model identifier, without any routing prefix (e.g. "gpt-4o").
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<ChatMessage>,

    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,

    /// Sampling temperature (0.0 = least random).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Requested output shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Create a minimal chat request with a model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
            response_format: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit.
    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request schema-constrained output.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// A chat completion response (OpenAI format).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    /// Unique identifier for this completion.
    pub id: String,

    /// The list of completion choices.
    pub choices: Vec<Choice>,

    /// Token usage statistics, if reported.
    #[serde(default)]
    pub usage: Option<Usage>,

    /// The model that generated the response.
    pub model: String,
}

impl ChatResponse {
    /// Text content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }

    /// Refusal message of the first choice, if the model declined.
    pub fn first_refusal(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.refusal.as_deref())
    }
}

/// A single completion choice within a response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Choice {
    /// The index of this choice in the list.
    pub index: i32,

    /// The assistant's reply.
    pub message: ResponseMessage,

    /// Why generation stopped (e.g. "stop", "length").
    pub finish_reason: Option<String>,
}

/// The assistant message inside a [`Choice`].
///
/// `content` is nullable on the wire: a model that refuses a structured
/// request returns `content: null` with a `refusal` string instead.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ResponseMessage {
    /// Author role, normally "assistant".
    pub role: String,

    /// Reply text.
    #[serde(default)]
    pub content: Option<String>,

    /// Refusal explanation, when the model declined to answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// Token usage statistics for a completion request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Usage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: i32,

    /// Number of tokens in the generated completion.
    pub completion_tokens: i32,

    /// Total tokens used (prompt + completion).
    pub total_tokens: i32,
}
