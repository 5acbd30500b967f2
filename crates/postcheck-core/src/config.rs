//! Configuration file schema and discovery.
//!
//! The config file is JSON. Every field has a default, so an empty object
//! (or no file at all) is a valid configuration. Keys may be written in
//! `snake_case` or `camelCase`; unknown keys are ignored.
//!
//! Discovery order:
//! 1. An explicit path (the CLI's `--config`). Must exist.
//! 2. `POSTCHECK_CONFIG` environment variable.
//! 3. `~/.postcheck/config.json`
//! 4. Built-in defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use postcheck_llm::{LlmProviderConfig, ProviderRouter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::model::ProviderModel;
use crate::prompts::{Audience, PromptSet};
use crate::workflow::{Workflow, WorkflowOptions, WorkflowVariant};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "POSTCHECK_CONFIG";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Model identifier, optionally prefixed with a provider (`openai/gpt-4o`).
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for every call.
    #[serde(default)]
    pub temperature: f64,

    /// Completion token cap for every call.
    #[serde(default, alias = "maxTokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,

    /// Branching (classify, then correct) or single-stage.
    #[serde(default)]
    pub variant: WorkflowVariant,

    /// Rubric audience.
    #[serde(default)]
    pub audience: Audience,

    /// Whether reports include the classifier's reason.
    #[serde(default = "default_true", alias = "includeReason")]
    pub include_reason: bool,

    /// Additional or overriding provider endpoints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<LlmProviderConfig>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: 0.0,
            max_tokens: None,
            variant: WorkflowVariant::default(),
            audience: Audience::default(),
            include_reason: true,
            providers: Vec::new(),
        }
    }
}

impl WorkflowConfig {
    /// Reject values no provider would accept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if let Some(max_tokens) = self.max_tokens
            && max_tokens <= 0
        {
            return Err(ConfigError::Invalid(format!(
                "max_tokens must be positive, got {max_tokens}"
            )));
        }
        Ok(())
    }

    /// Router over the built-in providers plus any configured ones.
    pub fn router(&self) -> ProviderRouter {
        ProviderRouter::with_builtins_and(self.providers.clone())
    }

    /// Resolve the configured model to a provider-backed model.
    pub fn build_model(&self) -> Result<ProviderModel, ConfigError> {
        let model = ProviderModel::routed(&self.router(), &self.model)
            .ok_or_else(|| ConfigError::UnknownProvider(self.model.clone()))?;
        Ok(model
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens))
    }

    /// Variant and prompts for [`Workflow::new`].
    pub fn workflow_options(&self) -> WorkflowOptions {
        WorkflowOptions {
            variant: self.variant,
            prompts: PromptSet::for_audience(self.audience),
        }
    }

    /// Validate, resolve the model, and build the workflow.
    pub fn build_workflow(&self) -> Result<Workflow, ConfigError> {
        self.validate()?;
        let model = self.build_model()?;
        info!(
            provider = model.provider_name(),
            model = model.model(),
            variant = %self.variant,
            audience = %self.audience,
            "workflow configured"
        );
        Ok(Workflow::new(Arc::new(model), self.workflow_options()))
    }
}

/// Find the config file from an environment value and a home directory.
///
/// The environment path is returned even if it does not exist, so the
/// caller can warn about it. The home path is returned only if it exists.
pub fn discover_config_path_from(
    env_path: Option<String>,
    home_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(env_path) = env_path.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(env_path));
    }
    let candidate = home_dir?.join(".postcheck").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Find the config file using the process environment and home directory.
pub fn discover_config_path() -> Option<PathBuf> {
    discover_config_path_from(std::env::var(CONFIG_ENV).ok(), dirs::home_dir())
}

/// Read and parse one config file.
pub fn read_config(path: &Path) -> Result<WorkflowConfig, ConfigError> {
    debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration following the discovery order in the module docs.
pub fn load_config(path_override: Option<&Path>) -> Result<WorkflowConfig, ConfigError> {
    if let Some(path) = path_override {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return read_config(path);
    }

    let Some(path) = discover_config_path() else {
        info!("no config file found, using defaults");
        return Ok(WorkflowConfig::default());
    };

    if !path.exists() {
        warn!(path = %path.display(), "config path does not exist, using defaults");
        return Ok(WorkflowConfig::default());
    }

    read_config(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_is_default() {
        let config: WorkflowConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WorkflowConfig::default());
        assert_eq!(config.model, "openai/gpt-4o");
        assert_eq!(config.temperature, 0.0);
        assert!(config.include_reason);
        assert_eq!(config.variant, WorkflowVariant::Branching);
        assert_eq!(config.audience, Audience::General);
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let config: WorkflowConfig = serde_json::from_str(
            r#"{
                "model": "gemini/gemini-2.5-flash",
                "maxTokens": 512,
                "includeReason": false,
                "variant": "single-stage",
                "audience": "children",
                "providers": [{
                    "name": "local",
                    "baseUrl": "http://localhost:8080/v1",
                    "apiKeyEnv": "LOCAL_KEY",
                    "modelPrefix": "local/"
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_tokens, Some(512));
        assert!(!config.include_reason);
        assert_eq!(config.variant, WorkflowVariant::SingleStage);
        assert_eq!(config.audience, Audience::Children);
        assert_eq!(config.providers[0].model_prefix.as_deref(), Some("local/"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: WorkflowConfig =
            serde_json::from_str(r#"{"assistant_id": "abc", "temperature": 0.2}"#).unwrap();
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = WorkflowConfig::default();
        assert!(config.validate().is_ok());

        config.temperature = 3.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.temperature = 0.0;
        config.max_tokens = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.max_tokens = None;
        config.model = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn configured_provider_is_routable() {
        let config: WorkflowConfig = serde_json::from_str(
            r#"{
                "model": "local/llama-3.1-8b",
                "providers": [{
                    "name": "local",
                    "base_url": "http://localhost:8080/v1",
                    "api_key_env": "LOCAL_KEY",
                    "model_prefix": "local/"
                }]
            }"#,
        )
        .unwrap();
        let model = config.build_model().unwrap();
        assert_eq!(model.provider_name(), "local");
        assert_eq!(model.model(), "llama-3.1-8b");
    }

    #[test]
    fn build_workflow_uses_variant() {
        let config = WorkflowConfig {
            variant: WorkflowVariant::SingleStage,
            ..Default::default()
        };
        let workflow = config.build_workflow().unwrap();
        assert_eq!(workflow.variant(), WorkflowVariant::SingleStage);
    }

    #[test]
    fn discover_prefers_env_path() {
        let path = discover_config_path_from(Some("/etc/postcheck.json".into()), None);
        assert_eq!(path, Some(PathBuf::from("/etc/postcheck.json")));
    }

    #[test]
    fn discover_finds_home_config_only_if_present() {
        let home = tempfile::tempdir().unwrap();
        assert_eq!(
            discover_config_path_from(None, Some(home.path().to_path_buf())),
            None
        );

        let dir = home.path().join(".postcheck");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), "{}").unwrap();
        assert_eq!(
            discover_config_path_from(Some(String::new()), Some(home.path().to_path_buf())),
            Some(dir.join("config.json"))
        );
    }

    #[test]
    fn load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"model": "openai/gpt-4o-mini", "temperature": 0.1}}"#).unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.temperature, 0.1);
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let err = load_config(Some(Path::new("/nonexistent/postcheck/config.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_invalid_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn load_from_env_var() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"audience": "children"}}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        temp_env::with_var(CONFIG_ENV, Some(path), || {
            let config = load_config(None).unwrap();
            assert_eq!(config.audience, Audience::Children);
        });
    }

    #[test]
    fn missing_env_path_falls_back_to_defaults() {
        temp_env::with_var(
            CONFIG_ENV,
            Some("/nonexistent/postcheck-env-config.json"),
            || {
                let config = load_config(None).unwrap();
                assert_eq!(config, WorkflowConfig::default());
            },
        );
    }
}
