//! Prefix-based model-to-provider routing.
//!
//! Model identifiers in configuration carry a provider prefix
//! (`openai/gpt-4o`). [`ProviderRouter`] resolves that prefix to a provider
//! and hands back the bare model name the provider expects.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{self, LlmProviderConfig};
use crate::openai_compat::OpenAiCompatProvider;
use crate::provider::Provider;

/// Routes model names to providers by longest matching prefix.
///
/// A model with no matching prefix goes to the default provider (the first
/// configuration given) with its name unchanged.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    /// (prefix, provider name), longest prefix first.
    prefix_map: Vec<(String, String)>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a router from provider configurations. The first entry is the
    /// default. A later entry with the same name replaces an earlier one.
    pub fn from_configs(configs: Vec<LlmProviderConfig>) -> Self {
        let providers = configs
            .into_iter()
            .map(|c| {
                let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::new(c.clone()));
                (c, provider)
            })
            .collect();
        Self::from_providers(providers)
    }

    /// Create a router from already-built providers, paired with the config
    /// that supplies their routing prefix.
    pub fn from_providers(entries: Vec<(LlmProviderConfig, Arc<dyn Provider>)>) -> Self {
        let default_provider = entries
            .first()
            .map(|(c, _)| c.name.clone())
            .unwrap_or_default();

        let mut providers: HashMap<String, Arc<dyn Provider>> = HashMap::new();
        let mut prefix_map: Vec<(String, String)> = Vec::new();

        for (config, provider) in entries {
            if let Some(prefix) = config.model_prefix {
                prefix_map.retain(|(p, _)| *p != prefix);
                prefix_map.push((prefix, config.name.clone()));
            }
            providers.insert(config.name, provider);
        }

        prefix_map.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            providers,
            prefix_map,
            default_provider,
        }
    }

    /// Router over the built-in providers followed by `extra`, so an extra
    /// entry named like a built-in overrides it.
    pub fn with_builtins_and(extra: Vec<LlmProviderConfig>) -> Self {
        let mut configs = config::builtin_providers();
        configs.extend(extra);
        Self::from_configs(configs)
    }

    /// Router over the built-in providers only.
    pub fn with_builtins() -> Self {
        Self::from_configs(config::builtin_providers())
    }

    /// Resolve a model identifier to its provider and bare model name.
    ///
    /// Returns `None` when neither a prefix nor a default provider matches.
    pub fn route(&self, model: &str) -> Option<(Arc<dyn Provider>, String)> {
        for (prefix, provider_name) in &self.prefix_map {
            if let Some(stripped) = model.strip_prefix(prefix.as_str())
                && let Some(provider) = self.providers.get(provider_name)
            {
                return Some((Arc::clone(provider), stripped.to_string()));
            }
        }

        self.providers
            .get(&self.default_provider)
            .map(|p| (Arc::clone(p), model.to_string()))
    }

    /// Names of all registered providers, sorted.
    pub fn providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the default provider.
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }
}

impl std::fmt::Debug for ProviderRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRouter")
            .field("providers", &self.providers())
            .field("prefix_map", &self.prefix_map)
            .field("default_provider", &self.default_provider)
            .finish()
    }
}
