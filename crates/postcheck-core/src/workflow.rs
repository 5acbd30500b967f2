//! The workflow state machine.
//!
//! ```text
//! branching:     START -> CLASSIFY -> END            (tier == safe)
//!                                  -> CORRECT -> END (otherwise)
//! single-stage:  START -> ASSESS -> END
//! ```
//!
//! [`next`] is the whole transition table. [`Workflow::invoke`] walks it,
//! running one step per non-terminal stage, strictly in sequence.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info_span};

use crate::assessor::Assessor;
use crate::classifier::Classifier;
use crate::corrector::Corrector;
use crate::error::WorkflowError;
use crate::model::StructuredModel;
use crate::prompts::PromptSet;
use crate::state::WorkflowState;
use crate::tier::SafetyTier;

/// A position in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Before any step.
    Start,
    /// Classifier step.
    Classify,
    /// Corrector step.
    Correct,
    /// Single-call assessor step.
    Assess,
    /// Terminal.
    Done,
}

impl Stage {
    /// Lowercase stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Classify => "classify",
            Self::Correct => "correct",
            Self::Assess => "assess",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which graph to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowVariant {
    /// Classify, then correct only when the tier is not SAFE.
    #[default]
    Branching,
    /// One call returning the full assessment.
    #[serde(alias = "single_stage", alias = "singleStage")]
    SingleStage,
}

impl WorkflowVariant {
    /// Config/CLI name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Branching => "branching",
            Self::SingleStage => "single-stage",
        }
    }
}

impl fmt::Display for WorkflowVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "branching" => Ok(Self::Branching),
            "single-stage" | "single" => Ok(Self::SingleStage),
            other => Err(format!(
                "unknown workflow variant: {other} (expected branching or single-stage)"
            )),
        }
    }
}

/// Transition function. `tier` is the tier recorded so far; it only
/// matters when leaving [`Stage::Classify`].
pub fn next(stage: Stage, tier: SafetyTier, variant: WorkflowVariant) -> Stage {
    match stage {
        Stage::Start => match variant {
            WorkflowVariant::Branching => Stage::Classify,
            WorkflowVariant::SingleStage => Stage::Assess,
        },
        Stage::Classify if tier.is_safe() => Stage::Done,
        Stage::Classify => Stage::Correct,
        Stage::Correct | Stage::Assess | Stage::Done => Stage::Done,
    }
}

/// Construction-time settings for a [`Workflow`].
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    /// Graph to run.
    pub variant: WorkflowVariant,
    /// System prompts for the steps.
    pub prompts: PromptSet,
}

/// A ready-to-run workflow.
///
/// Immutable once built; share it freely. Each [`invoke`](Self::invoke)
/// owns its own [`WorkflowState`].
pub struct Workflow {
    variant: WorkflowVariant,
    classifier: Classifier,
    corrector: Corrector,
    assessor: Assessor,
}

impl Workflow {
    /// Build a workflow whose steps all use `model`.
    pub fn new(model: Arc<dyn StructuredModel>, options: WorkflowOptions) -> Self {
        let WorkflowOptions { variant, prompts } = options;
        Self {
            variant,
            classifier: Classifier::new(Arc::clone(&model), prompts.classifier),
            corrector: Corrector::new(Arc::clone(&model), prompts.corrector),
            assessor: Assessor::new(model, prompts.assessor),
        }
    }

    /// The graph this workflow runs.
    pub fn variant(&self) -> WorkflowVariant {
        self.variant
    }

    /// Run the workflow to completion for one post.
    ///
    /// Any step failure ends the invocation; no partial state is returned.
    pub async fn invoke(
        &self,
        input_text: impl Into<String>,
    ) -> Result<WorkflowState, WorkflowError> {
        let mut state = WorkflowState::new(input_text);
        let span = info_span!("workflow", variant = %self.variant, chars = state.input_text().chars().count());

        async move {
            let mut stage = next(Stage::Start, state.safety_tier, self.variant);
            while stage != Stage::Done {
                debug!(stage = %stage, "entering stage");
                state = self.step(stage, state).await?;
                stage = next(stage, state.safety_tier, self.variant);
            }
            debug!(tier = %state.safety_tier, "workflow finished");
            Ok(state)
        }
        .instrument(span)
        .await
    }

    async fn step(
        &self,
        stage: Stage,
        state: WorkflowState,
    ) -> Result<WorkflowState, WorkflowError> {
        match stage {
            Stage::Classify => self.classifier.run(state).await,
            Stage::Correct => self.corrector.run(state).await,
            Stage::Assess => self.assessor.run(state).await,
            Stage::Start | Stage::Done => Ok(state),
        }
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
