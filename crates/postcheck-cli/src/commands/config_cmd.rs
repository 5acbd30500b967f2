//! `postcheck config` -- display resolved configuration.
//!
//! Prints the loaded configuration together with the provider the configured
//! model routes to. Only API key environment variable names are shown.

use postcheck_core::WorkflowConfig;
use serde::Serialize;

#[derive(Serialize)]
struct ConfigView<'a> {
    #[serde(flatten)]
    config: &'a WorkflowConfig,
    resolved: Resolved,
}

#[derive(Serialize)]
struct Resolved {
    providers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

fn resolve(config: &WorkflowConfig) -> Resolved {
    let providers = config.router().providers();
    let model = config.build_model().ok();
    Resolved {
        providers,
        provider: model.as_ref().map(|m| m.provider_name().to_string()),
        model: model.as_ref().map(|m| m.model().to_string()),
    }
}

/// Render the resolved configuration as pretty JSON.
pub fn render(config: &WorkflowConfig) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ConfigView {
        config,
        resolved: resolve(config),
    })
}

/// Print the resolved configuration.
pub fn config_show(config: &WorkflowConfig) -> anyhow::Result<()> {
    println!("{}", render(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves_to_openai() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&WorkflowConfig::default()).unwrap()).unwrap();
        assert_eq!(json["model"], "openai/gpt-4o");
        assert_eq!(json["variant"], "branching");
        assert_eq!(json["resolved"]["provider"], "openai");
        assert_eq!(json["resolved"]["model"], "gpt-4o");
    }

    #[test]
    fn api_keys_are_not_rendered() {
        let config: WorkflowConfig = serde_json::from_str(
            r#"{"providers": [{
                "name": "local",
                "base_url": "http://localhost:8080/v1",
                "api_key_env": "LOCAL_KEY"
            }]}"#,
        )
        .unwrap();
        let out = render(&config).unwrap();
        assert!(out.contains("LOCAL_KEY"));
        assert!(!out.to_lowercase().contains("\"api_key\""));
    }
}
