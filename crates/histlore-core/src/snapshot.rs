use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::shape::Shape;

/// One canonical usage shape of a command, identified by its signature hash.
///
/// The hash is a pure function of `(command, subcommand, flags, option
/// shapes, arg shapes)`; two invocations with different literal values but
/// the same shape collapse to the same signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSignature {
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<String>,
    /// Sorted ordinally at signature build time.
    pub flags: Vec<String>,
    /// Option key to value shape (not the literal value).
    pub options: BTreeMap<String, Shape>,
    /// Positional argument shapes, order-preserving: `cp <path> <path>` is
    /// a different pattern from its reversal only if the shapes differ.
    pub arg_shapes: Vec<Shape>,
    pub frequency: u64,
    /// First raw line that produced this signature; set once, never replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative_example: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_seen: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_seen: Option<OffsetDateTime>,
}

/// Per-command aggregate. Invariant: `total_uses` equals the sum of the
/// pattern frequencies at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPatterns {
    /// First-seen spelling; grouping is case-insensitive.
    pub command: String,
    pub total_uses: u64,
    pub patterns: Vec<PatternSignature>,
}

impl CommandPatterns {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            total_uses: 0,
            patterns: Vec::new(),
        }
    }

    /// Find a pattern by signature hash.
    pub fn pattern_mut(&mut self, signature: &str) -> Option<&mut PatternSignature> {
        self.patterns.iter_mut().find(|p| p.signature == signature)
    }
}

/// Complete point-in-time aggregate of all command patterns. Built fresh on
/// each aggregation run and never mutated after being handed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternsSnapshot {
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Keyed by the lowercase canonical command name.
    pub commands: BTreeMap<String, CommandPatterns>,
}

impl PatternsSnapshot {
    pub fn new(generated_at: OffsetDateTime) -> Self {
        Self {
            version: crate::SCHEMA_VERSION.to_string(),
            generated_at,
            commands: BTreeMap::new(),
        }
    }

    /// Sum of `total_uses` across all commands.
    pub fn total_uses(&self) -> u64 {
        self.commands.values().map(|c| c.total_uses).sum()
    }

    /// Count of distinct patterns across all commands.
    pub fn unique_patterns(&self) -> usize {
        self.commands.values().map(|c| c.patterns.len()).sum()
    }
}
