//! LLM provider layer for postcheck.
//!
//! A small, self-contained client for OpenAI-compatible chat completion
//! endpoints, with support for schema-constrained (structured) output.
//!
//! # Architecture
//!
//! - [`Provider`] trait defines the chat completion interface
//! - [`OpenAiCompatProvider`] implements it over HTTP with `reqwest`
//! - [`ProviderRouter`] resolves `prefix/model` identifiers to providers
//! - [`LlmProviderConfig`] describes how to connect to a provider
//! - [`extract_json_object`] recovers the JSON object from reply text
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use postcheck_llm::{ChatMessage, ChatRequest, ProviderRouter, ResponseFormat};
//!
//! let router = ProviderRouter::with_builtins();
//! let (provider, model) = router.route("openai/gpt-4o").unwrap();
//!
//! let request = ChatRequest::new(model, vec![
//!     ChatMessage::system("Classify the post."),
//!     ChatMessage::user("Post: hello"),
//! ])
//! .with_temperature(0.0)
//! .with_response_format(ResponseFormat::json_schema("tier", schema));
//!
//! let response = provider.complete(&request).await?;
//! ```

pub mod config;
pub mod error;
pub mod json_extract;
pub mod openai_compat;
pub mod provider;
pub mod router;
pub mod types;

pub use config::LlmProviderConfig;
pub use error::{ProviderError, Result};
pub use json_extract::extract_json_object;
pub use openai_compat::OpenAiCompatProvider;
pub use provider::Provider;
pub use router::ProviderRouter;
pub use types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat, Usage};
