//! CLI command implementations for `postcheck`.
//!
//! - [`check`] -- Run the workflow on one post.
//! - [`config_cmd`] -- Print the resolved configuration.

pub mod check;
pub mod config_cmd;

use std::path::Path;

use postcheck_core::WorkflowConfig;

/// Load configuration from the given path override or via auto-discovery.
///
/// If `config_override` is provided, it must exist. Otherwise the discovery
/// chain is `POSTCHECK_CONFIG`, then `~/.postcheck/config.json`, then
/// built-in defaults.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<WorkflowConfig> {
    let config = postcheck_core::load_config(config_override.map(Path::new))?;
    Ok(config)
}
