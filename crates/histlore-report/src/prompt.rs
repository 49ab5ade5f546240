use serde_json::json;
use tracing::warn;

use histlore_core::snapshot::{CommandPatterns, PatternsSnapshot};
use histlore_core::state::{RegenItem, RegenPlan};
use histlore_store::{safe_file_name, HistlorePaths};

use crate::{lookup, now_rfc3339, ranked_patterns};

const MAX_EXAMPLES: usize = 8;

/// Write one generation prompt per planned command to
/// `prompts/<safe name>.prompt.json`. A failure to write a single prompt is
/// warned about and skipped; the rest still get written.
pub fn write_prompts(
    paths: &HistlorePaths,
    snapshot: &PatternsSnapshot,
    plan: &RegenPlan,
    top_patterns: Option<usize>,
) -> anyhow::Result<()> {
    paths.ensure_layout()?;
    for item in &plan.commands {
        let Some(patterns) = lookup(snapshot, &item.command) else {
            continue;
        };
        let prompt = build_prompt(patterns, item, top_patterns);
        let path = paths
            .prompts_dir
            .join(format!("{}.prompt.json", safe_file_name(&item.command)));
        if let Err(err) = histlore_store::write_json(&path, &prompt) {
            warn!(command = %item.command, %err, "failed to write prompt");
        }
    }
    Ok(())
}

/// The machine-readable prompt payload handed to a cheatsheet generator:
/// stats, ranked patterns, and representative examples.
pub fn build_prompt(
    patterns: &CommandPatterns,
    item: &RegenItem,
    top_patterns: Option<usize>,
) -> serde_json::Value {
    let ranked = ranked_patterns(patterns, top_patterns);

    let pattern_objs: Vec<_> = ranked
        .iter()
        .map(|p| {
            json!({
                "signature": p.signature,
                "subcommand": p.subcommand,
                "flags": p.flags,
                "options": p.options,
                "arg_shapes": p.arg_shapes,
                "frequency": p.frequency,
                "representative_example": p.representative_example,
                "first_seen": p.first_seen.map(|t| t
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_default()),
                "last_seen": p.last_seen.map(|t| t
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_default()),
            })
        })
        .collect();

    let examples: Vec<_> = ranked_patterns(patterns, None)
        .into_iter()
        .filter(|p| {
            p.representative_example
                .as_deref()
                .is_some_and(|e| !e.trim().is_empty())
        })
        .take(MAX_EXAMPLES)
        .map(|p| {
            json!({
                "pattern_signature": p.signature,
                "command_line": p.representative_example,
            })
        })
        .collect();

    json!({
        "version": histlore_core::SCHEMA_VERSION,
        "entry_schema_version": histlore_core::SCHEMA_VERSION,
        "command": patterns.command,
        "generated_at": now_rfc3339(),
        "generator": { "reason": item.reason.to_string(), "notes": null },
        "stats": {
            "total_uses": patterns.total_uses,
            "unique_patterns": patterns.patterns.len(),
        },
        "patterns": pattern_objs,
        "examples": examples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use histlore_core::aggregate::aggregate_at;
    use histlore_core::parse::parse_line;
    use histlore_core::state::RegenReason;
    use time::OffsetDateTime;

    fn snap(lines: &[&str]) -> PatternsSnapshot {
        aggregate_at(
            lines.iter().filter_map(|l| parse_line(l)),
            OffsetDateTime::UNIX_EPOCH,
        )
    }

    fn item(command: &str) -> RegenItem {
        RegenItem {
            command: command.into(),
            reason: RegenReason::NewCommand,
            patterns_hash: "h".into(),
        }
    }

    #[test]
    fn prompt_carries_stats_and_ranked_patterns() {
        let snapshot = snap(&["git status", "git status", "git push origin main"]);
        let git = &snapshot.commands["git"];
        let prompt = build_prompt(git, &item("git"), None);

        assert_eq!(prompt["command"], "git");
        assert_eq!(prompt["stats"]["total_uses"], 3);
        assert_eq!(prompt["stats"]["unique_patterns"], 2);
        assert_eq!(prompt["generator"]["reason"], "new_command");
        // Most frequent pattern first.
        assert_eq!(prompt["patterns"][0]["frequency"], 2);
        assert_eq!(prompt["patterns"][0]["subcommand"], "status");
    }

    #[test]
    fn top_patterns_cap_respected() {
        let snapshot = snap(&["git status", "git push", "git pull"]);
        let git = &snapshot.commands["git"];
        let prompt = build_prompt(git, &item("git"), Some(2));
        assert_eq!(prompt["patterns"].as_array().unwrap().len(), 2);
        // Examples keep drawing from the full pattern list.
        assert_eq!(prompt["examples"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn write_prompts_creates_one_file_per_planned_command() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = HistlorePaths::discover(tmp.path());
        let snapshot = snap(&["git status", "ls -la"]);
        let mut plan = RegenPlan::new(OffsetDateTime::UNIX_EPOCH);
        plan.commands.push(item("git"));
        plan.commands.push(item("absent"));

        write_prompts(&paths, &snapshot, &plan, None).unwrap();
        assert!(paths.prompts_dir.join("git.prompt.json").is_file());
        // Commands missing from the snapshot are skipped without error.
        assert!(!paths.prompts_dir.join("absent.prompt.json").exists());
        assert!(!paths.prompts_dir.join("ls.prompt.json").exists());
    }
}
