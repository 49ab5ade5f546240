use serde::{Deserialize, Serialize};

use crate::json::read_json;
use crate::paths::HistlorePaths;

/// Workspace configuration, read from `config.json` at the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Regex patterns; a command whose name matches any of them is excluded
    /// from diffing and reporting.
    #[serde(default)]
    pub command_filters: Vec<String>,
}

impl AppConfig {
    /// Load config from the workspace, falling back to defaults when the
    /// file is absent.
    pub fn load(paths: &HistlorePaths) -> anyhow::Result<Self> {
        Ok(read_json(&paths.config_json)?.unwrap_or_default())
    }
}
