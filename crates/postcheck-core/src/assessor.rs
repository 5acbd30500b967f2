//! Single-call assessment: tier, reason, suggestion and rewrite at once.
//!
//! Used by [`WorkflowVariant::SingleStage`](crate::workflow::WorkflowVariant).
//! The result is filled regardless of tier: `suggestion` must carry text, and
//! so must `corrected_text` unless the post itself is blank.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::model::{OutputSchema, StructuredModel};
use crate::prompts::post_message;
use crate::state::{CorrectionResult, WorkflowState};
use crate::tier::SafetyTier;
use crate::workflow::Stage;

#[derive(Debug, Deserialize)]
struct AssessmentReply {
    level: SafetyTier,
    reason: String,
    suggestion: String,
    corrected_text: String,
}

/// Classifies and corrects a post in one model call.
pub struct Assessor {
    model: Arc<dyn StructuredModel>,
    system_prompt: String,
    schema: OutputSchema,
}

impl Assessor {
    /// Assessor using `system_prompt` as its instructions.
    pub fn new(model: Arc<dyn StructuredModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            schema: OutputSchema::assessment(),
        }
    }

    /// Step form: assess `state`'s post and fill every field.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, WorkflowError> {
        let value = self
            .model
            .complete_structured(
                &self.system_prompt,
                &post_message(state.input_text()),
                &self.schema,
            )
            .await
            .map_err(|source| WorkflowError::Model {
                stage: Stage::Assess,
                source,
            })?;

        let reply: AssessmentReply = serde_json::from_value(value).map_err(|source| {
            warn!(error = %source, "assessor reply does not match schema");
            WorkflowError::SchemaViolation {
                stage: Stage::Assess,
                schema: self.schema.name,
                source,
            }
        })?;

        let result = CorrectionResult {
            suggestion: reply.suggestion,
            corrected_text: reply.corrected_text,
        };
        let blank = match result.blank_field() {
            Some("corrected_text") if state.input_text().trim().is_empty() => None,
            other => other,
        };
        if let Some(field) = blank {
            warn!(blank_field = field, tier = %reply.level, "assessor returned a blank field");
            return Err(WorkflowError::EmptyField {
                stage: Stage::Assess,
                field,
            });
        }

        info!(tier = %reply.level, "post assessed");
        state.safety_tier = reply.level;
        state.tier_reason = reply.reason;
        state.result = result;
        Ok(state)
    }
}
