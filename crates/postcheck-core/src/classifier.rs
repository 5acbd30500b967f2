//! Classification step: post text in, `{tier, reason}` out.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::model::{OutputSchema, StructuredModel};
use crate::prompts::post_message;
use crate::state::WorkflowState;
use crate::tier::SafetyTier;
use crate::workflow::Stage;

/// What the classifier decided.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Classification {
    /// Assigned tier (wire name `level`).
    #[serde(rename = "level")]
    pub tier: SafetyTier,
    /// Explanation for the tier.
    pub reason: String,
}

/// Assigns a [`SafetyTier`] to a post.
///
/// The tier is entirely the model's judgment against the rubric; nothing
/// here second-guesses it.
pub struct Classifier {
    model: Arc<dyn StructuredModel>,
    system_prompt: String,
    schema: OutputSchema,
}

impl Classifier {
    /// Classifier using `system_prompt` as the rubric.
    pub fn new(model: Arc<dyn StructuredModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            schema: OutputSchema::classification(),
        }
    }

    /// Classify a post.
    pub async fn classify(&self, input_text: &str) -> Result<Classification, WorkflowError> {
        let value = self
            .model
            .complete_structured(&self.system_prompt, &post_message(input_text), &self.schema)
            .await
            .map_err(|source| WorkflowError::Model {
                stage: Stage::Classify,
                source,
            })?;

        serde_json::from_value(value).map_err(|source| {
            warn!(error = %source, "classifier reply does not match schema");
            WorkflowError::SchemaViolation {
                stage: Stage::Classify,
                schema: self.schema.name,
                source,
            }
        })
    }

    /// Step form: classify `state`'s post and record the tier and reason.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, WorkflowError> {
        let Classification { tier, reason } = self.classify(state.input_text()).await?;
        info!(tier = %tier, "post classified");
        state.safety_tier = tier;
        state.tier_reason = reason;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_reads_level_field() {
        let c: Classification =
            serde_json::from_value(serde_json::json!({"level": "warning", "reason": "rude"}))
                .unwrap();
        assert_eq!(c.tier, SafetyTier::Warning);
        assert_eq!(c.reason, "rude");
    }

    #[test]
    fn classification_requires_level() {
        let err = serde_json::from_value::<Classification>(serde_json::json!({"reason": "x"}))
            .unwrap_err();
        assert!(err.to_string().contains("level"));
    }

    #[test]
    fn classification_requires_reason() {
        assert!(
            serde_json::from_value::<Classification>(serde_json::json!({"level": "safe"}))
                .is_err()
        );
    }

    #[test]
    fn classification_ignores_extra_fields() {
        let c: Classification = serde_json::from_value(
            serde_json::json!({"level": "safe", "reason": "", "confidence": 0.9}),
        )
        .unwrap();
        assert_eq!(c.tier, SafetyTier::Safe);
    }
}
