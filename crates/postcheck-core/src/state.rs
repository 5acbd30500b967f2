//! Per-invocation workflow state and the caller-facing report.

use serde::{Deserialize, Serialize};

use crate::tier::SafetyTier;

/// Output of the correction step.
///
/// Both fields stay empty when the post is classified SAFE in the branching
/// workflow; they are never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Advice on how to improve the post.
    pub suggestion: String,

    /// The post rewritten without the unsafe elements.
    pub corrected_text: String,
}

impl CorrectionResult {
    /// Whether neither field carries text.
    pub fn is_empty(&self) -> bool {
        self.suggestion.is_empty() && self.corrected_text.is_empty()
    }

    /// Wire name of the first field that is blank after trimming.
    pub fn blank_field(&self) -> Option<&'static str> {
        if self.suggestion.trim().is_empty() {
            Some("suggestion")
        } else if self.corrected_text.trim().is_empty() {
            Some("corrected_text")
        } else {
            None
        }
    }
}

/// Record threaded through one workflow invocation.
///
/// Created from the input post, handed by value to each step, and returned
/// to the caller at the end. The input text cannot be changed after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowState {
    input_text: String,

    /// Tier chosen by the classifier. SAFE until classification runs.
    pub safety_tier: SafetyTier,

    /// Classifier's explanation. Empty until classification runs.
    pub tier_reason: String,

    /// Correction output. Empty unless a correcting step ran.
    pub result: CorrectionResult,
}

impl WorkflowState {
    /// Fresh state for a post.
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            safety_tier: SafetyTier::default(),
            tier_reason: String::new(),
            result: CorrectionResult::default(),
        }
    }

    /// The original post.
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Caller-facing summary. `include_reason = false` drops the reason.
    pub fn report(&self, include_reason: bool) -> SafetyReport {
        SafetyReport {
            level: self.safety_tier,
            reason: include_reason.then(|| self.tier_reason.clone()),
            suggestion: self.result.suggestion.clone(),
            corrected_text: self.result.corrected_text.clone(),
        }
    }
}

/// Serialized result of an invocation: `{level, reason?, suggestion, corrected_text}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    /// Assigned tier.
    pub level: SafetyTier,

    /// Why the tier was chosen. Omitted when reasons are not reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Improvement advice; empty for SAFE posts in the branching workflow.
    pub suggestion: String,

    /// Rewritten post; empty for SAFE posts in the branching workflow.
    pub corrected_text: String,
}
