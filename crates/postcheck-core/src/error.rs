//! Error types for postcheck-core.
//!
//! [`ModelError`] covers a single structured model call. [`WorkflowError`]
//! is what an invocation returns: it names the stage that failed so the
//! caller can tell a classifier failure from a corrector failure.
//! [`ConfigError`] covers loading and resolving configuration.

use std::path::PathBuf;

use postcheck_llm::ProviderError;
use thiserror::Error;

use crate::workflow::Stage;

/// Failure of one `complete_structured` call.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The outbound call failed (network, auth, quota, timeout).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The model declined to answer.
    #[error("model refused: {0}")]
    Refused(String),

    /// The reply did not contain a JSON object.
    #[error("malformed output: {0}")]
    MalformedOutput(String),
}

/// Failure of a workflow invocation. Every variant is terminal.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WorkflowError {
    /// The model call behind a stage failed.
    #[error("{stage} step failed: {source}")]
    Model {
        /// Stage whose call failed.
        stage: Stage,
        /// Underlying model error.
        #[source]
        source: ModelError,
    },

    /// The reply parsed as JSON but does not fit the stage's schema
    /// (missing field, wrong type, tier outside the enumeration).
    #[error("{stage} output does not match the `{schema}` schema: {source}")]
    SchemaViolation {
        /// Stage whose output was rejected.
        stage: Stage,
        /// Name of the expected schema.
        schema: &'static str,
        /// Deserialization error describing the mismatch.
        #[source]
        source: serde_json::Error,
    },

    /// A field that must carry text came back blank.
    #[error("{stage} output has an empty `{field}` field")]
    EmptyField {
        /// Stage whose output was rejected.
        stage: Stage,
        /// Wire name of the blank field.
        field: &'static str,
    },
}

impl WorkflowError {
    /// Stage at which the invocation stopped.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Model { stage, .. }
            | Self::SchemaViolation { stage, .. }
            | Self::EmptyField { stage, .. } => *stage,
        }
    }

    /// Whether the model's output (rather than the transport) was at fault.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            Self::SchemaViolation { .. } | Self::EmptyField { .. } => true,
            Self::Model { source, .. } => !matches!(source, ModelError::Provider(_)),
        }
    }

    /// Whether rerunning the invocation later might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Model {
                source: ModelError::Provider(err),
                ..
            } if err.is_transient()
        )
    }

    /// Provider-suggested wait before rerunning, if any.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Self::Model {
                source: ModelError::Provider(err),
                ..
            } => err.retry_after(),
            _ => None,
        }
    }
}

/// Errors from loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`WorkflowConfig`](crate::config::WorkflowConfig).
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A field value is out of range or otherwise unusable.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// No provider is registered for the configured model.
    #[error("no provider available for model '{0}'")]
    UnknownProvider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display_is_transparent_for_provider() {
        let err = ModelError::from(ProviderError::Timeout { after_secs: 30 });
        assert_eq!(err.to_string(), "request timed out after 30s");
    }

    #[test]
    fn retry_hint_keeps_full_duration() {
        let err = WorkflowError::Model {
            stage: Stage::Classify,
            source: ModelError::Provider(ProviderError::RateLimited {
                retry_after_ms: u64::MAX,
            }),
        };
        assert!(err.is_transient());
        assert_eq!(
            format!("{:?}", err.retry_after()),
            format!("{:?}", Some(std::time::Duration::from_millis(u64::MAX)))
        );
    }

    #[test]
    fn workflow_error_names_stage() {
        let err = WorkflowError::EmptyField {
            stage: Stage::Correct,
            field: "corrected_text",
        };
        assert_eq!(err.stage(), Stage::Correct);
        assert_eq!(
            err.to_string(),
            "correct output has an empty `corrected_text` field"
        );
        assert!(err.is_contract_violation());
    }

    #[test]
    fn provider_failure_is_not_contract_violation() {
        let err = WorkflowError::Model {
            stage: Stage::Classify,
            source: ModelError::Provider(ProviderError::AuthFailed("bad key".into())),
        };
        assert!(!err.is_contract_violation());
        assert_eq!(err.to_string(), "classify step failed: authentication failed: bad key");
    }

    #[test]
    fn refusal_is_contract_violation() {
        let err = WorkflowError::Model {
            stage: Stage::Classify,
            source: ModelError::Refused("no".into()),
        };
        assert!(err.is_contract_violation());
    }

    #[test]
    fn config_not_found_display() {
        let err = ConfigError::NotFound(PathBuf::from("/tmp/missing.json"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.json");
    }
}
