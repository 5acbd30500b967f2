//! Provider connection settings and the built-in provider table.
//!
//! Each [`LlmProviderConfig`] describes how to reach one OpenAI-compatible
//! endpoint: base URL, the environment variable holding its API key, the
//! model prefix used for routing, and any extra headers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request timeout applied when a provider does not set `timeout_secs`.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for a single LLM provider endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Human-readable provider name (e.g. "openai").
    pub name: String,

    /// Base URL for the OpenAI-compatible API (e.g. "https://api.openai.com/v1").
    #[serde(alias = "baseUrl")]
    pub base_url: String,

    /// Environment variable that holds the API key (e.g. "OPENAI_API_KEY").
    #[serde(alias = "apiKeyEnv")]
    pub api_key_env: String,

    /// Prefix used for routing model names to this provider (e.g. "openai/").
    /// A model string like "openai/gpt-4o" is routed here and the prefix is
    /// stripped before the request is sent.
    #[serde(default, alias = "modelPrefix")]
    pub model_prefix: Option<String>,

    /// Extra HTTP headers to include in every request to this provider.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds. Defaults to [`DEFAULT_TIMEOUT_SECS`].
    #[serde(default, alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

impl LlmProviderConfig {
    /// Effective request timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// Returns the built-in provider configurations.
///
/// All of these speak the OpenAI chat-completions dialect and support the
/// `json_schema` response format. The first entry is the routing default.
pub fn builtin_providers() -> Vec<LlmProviderConfig> {
    vec![
        LlmProviderConfig {
            name: "openai".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            model_prefix: Some("openai/".into()),
            headers: HashMap::new(),
            timeout_secs: None,
        },
        LlmProviderConfig {
            name: "openrouter".into(),
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            model_prefix: Some("openrouter/".into()),
            headers: HashMap::new(),
            timeout_secs: None,
        },
        LlmProviderConfig {
            name: "gemini".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
            api_key_env: "GOOGLE_GEMINI_API_KEY".into(),
            model_prefix: Some("gemini/".into()),
            headers: HashMap::new(),
            timeout_secs: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_is_first_builtin() {
        let providers = builtin_providers();
        assert_eq!(providers[0].name, "openai");
        assert_eq!(providers[0].base_url, "https://api.openai.com/v1");
        assert_eq!(providers[0].api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn all_builtins_have_slash_prefixes() {
        for p in builtin_providers() {
            let prefix = p.model_prefix.as_deref().unwrap_or_default();
            assert!(prefix.ends_with('/'), "prefix for {} should end with /", p.name);
        }
    }

    #[test]
    fn timeout_falls_back_to_default() {
        let mut config = builtin_providers().remove(0);
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        config.timeout_secs = Some(15);
        assert_eq!(config.timeout_secs(), 15);
    }

    #[test]
    fn deserialize_minimal_with_camel_case() {
        let json = r#"{
            "name": "local",
            "baseUrl": "http://localhost:8080/v1",
            "apiKeyEnv": "LOCAL_KEY"
        }"#;
        let config: LlmProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "local");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert!(config.model_prefix.is_none());
        assert!(config.headers.is_empty());
        assert!(config.timeout_secs.is_none());
    }
}
