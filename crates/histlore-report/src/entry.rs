use std::collections::BTreeSet;

use serde_json::json;
use tracing::warn;

use histlore_core::snapshot::{CommandPatterns, PatternSignature, PatternsSnapshot};
use histlore_core::state::RegenPlan;
use histlore_store::HistlorePaths;

use crate::{lookup, now_rfc3339, ranked_patterns};

const MAX_EXAMPLES: usize = 8;

/// Write placeholder cheatsheet entries for every planned command under
/// `cheatsheets/entries/`. The entry shape matches what an external
/// generator would produce, with descriptive fields left blank.
pub fn write_placeholder_entries(
    paths: &HistlorePaths,
    snapshot: &PatternsSnapshot,
    plan: &RegenPlan,
    top_patterns: Option<usize>,
    generator_mode: &str,
) -> anyhow::Result<()> {
    paths.ensure_layout()?;
    for item in &plan.commands {
        let Some(patterns) = lookup(snapshot, &item.command) else {
            continue;
        };
        let entry =
            build_placeholder_entry(patterns, &item.patterns_hash, top_patterns, generator_mode);
        let path = paths.entry_path(&item.command);
        if let Err(err) = histlore_store::write_json(&path, &entry) {
            warn!(command = %item.command, %err, "failed to write entry");
        }
    }
    Ok(())
}

/// Assemble one placeholder entry from a command's aggregated patterns.
pub fn build_placeholder_entry(
    patterns: &CommandPatterns,
    patterns_hash: &str,
    top_patterns: Option<usize>,
    generator_mode: &str,
) -> serde_json::Value {
    let syntax_patterns: Vec<String> = ranked_patterns(patterns, top_patterns)
        .iter()
        .map(|p| build_syntax_pattern(p))
        .collect();

    let flags: BTreeSet<&str> = patterns
        .patterns
        .iter()
        .flat_map(|p| p.flags.iter().map(String::as_str))
        .collect();
    let options: BTreeSet<&str> = patterns
        .patterns
        .iter()
        .flat_map(|p| p.options.keys().map(String::as_str))
        .collect();
    let flags_and_options: Vec<_> = flags
        .iter()
        .chain(options.iter())
        .map(|name| json!({ "name": name, "description": "" }))
        .collect();

    let examples: Vec<_> = ranked_patterns(patterns, None)
        .into_iter()
        .filter_map(|p| p.representative_example.as_deref())
        .filter(|e| !e.trim().is_empty())
        .take(MAX_EXAMPLES)
        .map(|e| json!({ "command": e, "why": "" }))
        .collect();

    json!({
        "version": histlore_core::SCHEMA_VERSION,
        "command": patterns.command,
        "summary": format!("Placeholder entry generated locally (generator {generator_mode})."),
        "when_i_use_it": [],
        "syntax_patterns": syntax_patterns,
        "flags_and_options": flags_and_options,
        "subcommands": [],
        "examples": examples,
        "pitfalls": [],
        "related_commands": [],
        "regenerated_at": now_rfc3339(),
        "source": {
            "patterns_hash": patterns_hash,
            "input_hash": patterns_hash,
            "run_id": null,
        },
    })
}

/// Render one pattern as a skeletal syntax line, shapes in angle brackets:
/// `commit -m <word>`.
fn build_syntax_pattern(pattern: &PatternSignature) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(sub) = &pattern.subcommand {
        parts.push(sub.clone());
    }
    parts.extend(pattern.flags.iter().cloned());
    parts.extend(
        pattern
            .options
            .iter()
            .map(|(key, shape)| format!("{key} <{shape}>")),
    );
    parts.extend(pattern.arg_shapes.iter().map(|shape| format!("<{shape}>")));
    parts.retain(|p| !p.trim().is_empty());
    parts.join(" ")
}
