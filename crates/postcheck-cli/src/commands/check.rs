//! `postcheck check` -- run the safety workflow on one post.
//!
//! # Examples
//!
//! ```text
//! postcheck check "Come visit me at 123 Main St!"
//! echo "hello world" | postcheck check --json
//! postcheck check --variant single-stage --audience children -
//! ```

use std::io::Read;

use anyhow::Context;
use clap::Args;
use postcheck_core::{Audience, SafetyReport, WorkflowConfig, WorkflowVariant};
use tracing::{debug, warn};

/// Arguments for the `postcheck check` subcommand.
#[derive(Args)]
pub struct CheckArgs {
    /// Post text. Read from stdin when omitted or `-`.
    pub text: Option<String>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model to use, e.g. `openai/gpt-4o` (overrides config).
    #[arg(long)]
    pub model: Option<String>,

    /// Workflow variant: `branching` or `single-stage` (overrides config).
    #[arg(long)]
    pub variant: Option<WorkflowVariant>,

    /// Rubric audience: `general` or `children` (overrides config).
    #[arg(long)]
    pub audience: Option<Audience>,

    /// Leave the classifier's reason out of the report.
    #[arg(long)]
    pub no_reason: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Run the check command.
pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let workflow = config.build_workflow()?;
    let input = read_input(args.text.as_deref())?;
    debug!(chars = input.chars().count(), "post read");

    let state = workflow.invoke(input).await.inspect_err(|err| {
        if err.is_transient() {
            warn!(
                retry_after = ?err.retry_after(),
                "provider failure looks temporary; try again shortly"
            );
        }
    })?;
    let report = state.report(config.include_reason);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

fn apply_overrides(config: &mut WorkflowConfig, args: &CheckArgs) {
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    if let Some(audience) = args.audience {
        config.audience = audience;
    }
    if args.no_reason {
        config.include_reason = false;
    }
}

fn read_input(text: Option<&str>) -> anyhow::Result<String> {
    match text {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read post from stdin")?;
            Ok(buf.trim_end_matches(['\n', '\r']).to_string())
        }
    }
}

/// Human-readable report. Correction lines appear only when populated.
fn render_report(report: &SafetyReport) -> String {
    let mut out = format!("level: {}\n", report.level);
    if let Some(reason) = &report.reason {
        out.push_str(&format!("reason: {reason}\n"));
    }
    if !report.suggestion.is_empty() {
        out.push_str(&format!("suggestion: {}\n", report.suggestion));
    }
    if !report.corrected_text.is_empty() {
        out.push_str(&format!("corrected: {}\n", report.corrected_text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcheck_core::SafetyTier;

    fn args() -> CheckArgs {
        CheckArgs {
            text: Some("hi".into()),
            config: None,
            model: None,
            variant: None,
            audience: None,
            no_reason: false,
            json: false,
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = WorkflowConfig::default();
        let args = CheckArgs {
            model: Some("openrouter/anthropic/claude-sonnet-4".into()),
            variant: Some(WorkflowVariant::SingleStage),
            audience: Some(Audience::Children),
            no_reason: true,
            ..args()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.model, "openrouter/anthropic/claude-sonnet-4");
        assert_eq!(config.variant, WorkflowVariant::SingleStage);
        assert_eq!(config.audience, Audience::Children);
        assert!(!config.include_reason);
    }

    #[test]
    fn no_overrides_keep_config() {
        let mut config = WorkflowConfig::default();
        apply_overrides(&mut config, &args());
        assert_eq!(config, WorkflowConfig::default());
    }

    #[test]
    fn literal_text_is_used_as_is() {
        assert_eq!(read_input(Some("  spaced  ")).unwrap(), "  spaced  ");
    }

    #[test]
    fn safe_report_has_no_correction_lines() {
        let report = SafetyReport {
            level: SafetyTier::Safe,
            reason: Some("Harmless.".into()),
            suggestion: String::new(),
            corrected_text: String::new(),
        };
        assert_eq!(render_report(&report), "level: safe\nreason: Harmless.\n");
    }

    #[test]
    fn danger_report_lists_everything() {
        let report = SafetyReport {
            level: SafetyTier::Danger,
            reason: None,
            suggestion: "Remove the address.".into(),
            corrected_text: "Come visit!".into(),
        };
        let out = render_report(&report);
        assert!(out.starts_with("level: danger\n"));
        assert!(!out.contains("reason:"));
        assert!(out.contains("suggestion: Remove the address.\n"));
        assert!(out.ends_with("corrected: Come visit!\n"));
    }
}
