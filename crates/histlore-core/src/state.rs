use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Persisted memory of the last per-command content hash and where the
/// generated artifact lives. Read back as the diff baseline on the next run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Keyed by the lowercase canonical command name.
    #[serde(default)]
    pub commands: BTreeMap<String, StateEntry>,
}

impl StateSnapshot {
    pub fn new(generated_at: OffsetDateTime) -> Self {
        Self {
            version: crate::SCHEMA_VERSION.to_string(),
            generated_at,
            commands: BTreeMap::new(),
        }
    }

    /// A missing state file means every command is new.
    pub fn empty() -> Self {
        Self::new(OffsetDateTime::UNIX_EPOCH)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEntry {
    pub patterns_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_path: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<OffsetDateTime>,
}

/// Why a command appears in the regeneration plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenReason {
    NewCommand,
    PatternsChanged,
}

impl fmt::Display for RegenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegenReason::NewCommand => f.write_str("new_command"),
            RegenReason::PatternsChanged => f.write_str("patterns_changed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenItem {
    pub command: String,
    pub reason: RegenReason,
    pub patterns_hash: String,
}

/// The minimal set of commands whose documentation must be rebuilt, in
/// descending order of use. Produced fresh per run, never persisted as
/// authority (only as a work list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenPlan {
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub commands: Vec<RegenItem>,
}

impl RegenPlan {
    pub fn new(generated_at: OffsetDateTime) -> Self {
        Self {
            version: crate::SCHEMA_VERSION.to_string(),
            generated_at,
            commands: Vec::new(),
        }
    }
}
