//! # postcheck-core
//!
//! Safety check for social media posts before they are published.
//!
//! A post is classified into a [`SafetyTier`] with a reason. Posts that are
//! not SAFE are then rewritten: the corrector returns a short suggestion and
//! a corrected post with the problem removed. A single-stage variant does
//! both in one model call.
//!
//! Every model call uses schema-constrained output; a reply that does not
//! match its schema fails the run instead of falling back to a default.
//!
//! ```rust,ignore
//! use postcheck_core::{WorkflowConfig, load_config};
//!
//! let config = load_config(None)?;
//! let workflow = config.build_workflow()?;
//! let state = workflow.invoke("I live at 123 Main St, come by!").await?;
//! println!("{}", state.safety_tier);
//! ```

pub mod assessor;
pub mod classifier;
pub mod config;
pub mod corrector;
pub mod error;
pub mod model;
pub mod prompts;
pub mod state;
pub mod tier;
pub mod workflow;

pub use classifier::{Classification, Classifier};
pub use config::{WorkflowConfig, load_config};
pub use corrector::Corrector;
pub use error::{ConfigError, ModelError, WorkflowError};
pub use model::{OutputSchema, ProviderModel, StructuredModel};
pub use prompts::{Audience, PromptSet};
pub use state::{CorrectionResult, SafetyReport, WorkflowState};
pub use tier::SafetyTier;
pub use workflow::{Stage, Workflow, WorkflowOptions, WorkflowVariant};
