pub mod entry;
pub mod export;
pub mod prompt;
pub mod report;

use histlore_core::event::command_key;
use histlore_core::snapshot::{CommandPatterns, PatternSignature, PatternsSnapshot};

/// Current RFC 3339 timestamp, UTC.
pub(crate) fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

/// Look up a plan item's command in the snapshot.
pub(crate) fn lookup<'a>(
    snapshot: &'a PatternsSnapshot,
    command: &str,
) -> Option<&'a CommandPatterns> {
    snapshot.commands.get(&command_key(command))
}

/// A command's patterns by frequency descending (signature as tie-break),
/// truncated to `top` when given.
pub(crate) fn ranked_patterns(
    patterns: &CommandPatterns,
    top: Option<usize>,
) -> Vec<&PatternSignature> {
    let mut ranked: Vec<&PatternSignature> = patterns.patterns.iter().collect();
    ranked.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.signature.cmp(&b.signature))
    });
    if let Some(top) = top {
        ranked.truncate(top);
    }
    ranked
}
