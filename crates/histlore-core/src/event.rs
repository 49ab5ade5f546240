use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Where a history line came from. All fields optional; most history
/// formats carry no metadata at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<OffsetDateTime>,
}

/// One parsed command invocation from a single history line.
///
/// Constructed once per input line and consumed immediately by the
/// aggregator; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEvent {
    pub command: String,
    pub subcommand: Option<String>,
    /// Option tokens with no value, e.g. `-v`, `--force`.
    pub flags: Vec<String>,
    /// Option key to literal value, e.g. `--retry` -> `3`.
    pub options: BTreeMap<String, String>,
    /// Positional arguments in original order.
    pub arguments: Vec<String>,
    /// The sanitized source line.
    pub raw: String,
    #[serde(default)]
    pub source: CommandSource,
}

impl CommandEvent {
    /// Canonical lowercase key used for case-insensitive command grouping.
    pub fn key(&self) -> String {
        command_key(&self.command)
    }
}

/// Normalize a command name into the canonical map key. Commands are
/// compared case-insensitively throughout; the first-seen spelling is kept
/// as the display name.
pub fn command_key(command: &str) -> String {
    command.to_lowercase()
}
