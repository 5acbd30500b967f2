//! Correction step: rewrite a post that was not classified SAFE.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::model::{OutputSchema, StructuredModel};
use crate::prompts::correction_message;
use crate::state::{CorrectionResult, WorkflowState};
use crate::tier::SafetyTier;
use crate::workflow::Stage;

#[derive(Debug, Deserialize)]
struct CorrectionReply {
    suggestion: String,
    corrected_text: String,
}

/// Produces a suggestion and a rewritten post.
pub struct Corrector {
    model: Arc<dyn StructuredModel>,
    system_prompt: String,
    schema: OutputSchema,
}

impl Corrector {
    /// Corrector using `system_prompt` as its instructions.
    pub fn new(model: Arc<dyn StructuredModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            schema: OutputSchema::correction(),
        }
    }

    /// Rewrite `input_text` given its classification.
    ///
    /// Both returned fields are guaranteed non-blank.
    pub async fn correct(
        &self,
        input_text: &str,
        tier: SafetyTier,
        reason: &str,
    ) -> Result<CorrectionResult, WorkflowError> {
        let value = self
            .model
            .complete_structured(
                &self.system_prompt,
                &correction_message(input_text, tier, reason),
                &self.schema,
            )
            .await
            .map_err(|source| WorkflowError::Model {
                stage: Stage::Correct,
                source,
            })?;

        let reply: CorrectionReply = serde_json::from_value(value).map_err(|source| {
            warn!(error = %source, "corrector reply does not match schema");
            WorkflowError::SchemaViolation {
                stage: Stage::Correct,
                schema: self.schema.name,
                source,
            }
        })?;

        let result = CorrectionResult {
            suggestion: reply.suggestion,
            corrected_text: reply.corrected_text,
        };
        if let Some(field) = result.blank_field() {
            warn!(blank_field = field, "corrector returned a blank field");
            return Err(WorkflowError::EmptyField {
                stage: Stage::Correct,
                field,
            });
        }
        Ok(result)
    }

    /// Step form: correct `state`'s post and store the result.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, WorkflowError> {
        let result = self
            .correct(state.input_text(), state.safety_tier, &state.tier_reason)
            .await?;
        info!(
            tier = %state.safety_tier,
            unchanged = result.corrected_text == state.input_text(),
            "post corrected"
        );
        state.result = result;
        Ok(state)
    }
}
