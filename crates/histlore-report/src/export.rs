use std::fmt::Write as _;

use tracing::warn;

use histlore_core::snapshot::{CommandPatterns, PatternsSnapshot};
use histlore_core::state::{RegenItem, RegenPlan};
use histlore_store::{safe_file_name, HistlorePaths};

use crate::{lookup, ranked_patterns};

const MAX_EXAMPLES: usize = 6;

/// Re-rank a plan by current `total_uses` (name as tie-break) and truncate
/// to the top `max_commands`. Used before exporting so the cap keeps the
/// most-used commands, not the plan's own order.
pub fn cap_plan(snapshot: &PatternsSnapshot, plan: &RegenPlan, max_commands: usize) -> RegenPlan {
    let mut capped = RegenPlan {
        version: plan.version.clone(),
        generated_at: plan.generated_at,
        commands: plan.commands.clone(),
    };
    capped.commands.sort_by(|a, b| {
        let uses_a = lookup(snapshot, &a.command).map_or(0, |c| c.total_uses);
        let uses_b = lookup(snapshot, &b.command).map_or(0, |c| c.total_uses);
        uses_b.cmp(&uses_a).then_with(|| a.command.cmp(&b.command))
    });
    capped.commands.truncate(max_commands);
    capped
}

/// Write one web-ready prompt text per planned command to
/// `output/prompts_web/<safe name>.txt`.
pub fn write_web_prompts(
    paths: &HistlorePaths,
    snapshot: &PatternsSnapshot,
    plan: &RegenPlan,
    top_patterns: Option<usize>,
) -> anyhow::Result<()> {
    paths.ensure_layout()?;
    std::fs::create_dir_all(&paths.prompts_web_dir)?;
    for item in &plan.commands {
        let Some(patterns) = lookup(snapshot, &item.command) else {
            continue;
        };
        let content = build_web_prompt(patterns, item, top_patterns);
        let path = paths
            .prompts_web_dir
            .join(format!("{}.txt", safe_file_name(&item.command)));
        if let Err(err) = histlore_store::json::write_atomic(&path, content.as_bytes()) {
            warn!(command = %item.command, %err, "failed to export prompt");
        }
    }
    Ok(())
}

/// A copy-pasteable prompt for a chat generator: the expected JSON shape,
/// guidelines, then the command's ranked patterns and examples.
pub fn build_web_prompt(
    patterns: &CommandPatterns,
    item: &RegenItem,
    top_patterns: Option<usize>,
) -> String {
    let mut out = String::new();
    out.push_str("You are a CLI cheatsheet generator.\n");
    out.push_str(
        "Return a single JSON object only (no Markdown, no explanation, no code fences).\n",
    );
    out.push_str("Follow this shape and fill in thoughtful, concise values:\n");
    out.push_str("{\n");
    let _ = writeln!(out, "  \"version\": \"{}\",", histlore_core::SCHEMA_VERSION);
    let _ = writeln!(out, "  \"command\": \"{}\",", patterns.command);
    out.push_str("  \"summary\": \"...\",\n");
    out.push_str("  \"when_i_use_it\": [\"...\"],\n");
    out.push_str("  \"syntax_patterns\": [\"...\"],\n");
    out.push_str(
        "  \"flags_and_options\": [{\"name\": \"--flag\", \"description\": \"...\", \"example\": \"...\"}],\n",
    );
    out.push_str("  \"subcommands\": [],\n");
    out.push_str("  \"examples\": [{\"command\": \"...\", \"why\": \"...\"}],\n");
    out.push_str("  \"pitfalls\": [\"...\"],\n");
    out.push_str("  \"related_commands\": [\"...\"],\n");
    out.push_str("  \"regenerated_at\": \"<ISO-8601>\",\n");
    let _ = writeln!(
        out,
        "  \"source\": {{\"patterns_hash\": \"{0}\", \"input_hash\": \"{0}\", \"run_id\": \"manual-web\"}}",
        item.patterns_hash
    );
    out.push_str("}\n\n");

    out.push_str("Guidelines:\n");
    out.push_str("- Keep answers factual, safe, and concise.\n");
    out.push_str("- Use short sentences or fragments; avoid bullet markers.\n");
    out.push_str("- Prefer the most frequent patterns as defaults.\n");
    out.push_str(
        "- If you are unsure, leave fields empty strings or omit optional examples.\n\n",
    );

    let _ = writeln!(out, "Command: {}", patterns.command);
    let _ = writeln!(
        out,
        "Stats: total uses={}, unique patterns={}",
        patterns.total_uses,
        patterns.patterns.len()
    );
    out.push('\n');

    let ranked = ranked_patterns(patterns, top_patterns);
    out.push_str("Patterns (most used first):\n");
    for p in &ranked {
        let mut parts: Vec<String> = Vec::new();
        if let Some(sub) = &p.subcommand {
            parts.push(sub.clone());
        }
        if !p.flags.is_empty() {
            parts.push(p.flags.join(" "));
        }
        if !p.options.is_empty() {
            parts.push(
                p.options
                    .iter()
                    .map(|(key, shape)| format!("{key}=<{shape}>"))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
        if !p.arg_shapes.is_empty() {
            parts.push(
                p.arg_shapes
                    .iter()
                    .map(|shape| format!("<{shape}>"))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
        parts.retain(|s| !s.trim().is_empty());
        let _ = writeln!(
            out,
            "- freq={} | sig={} | {}",
            p.frequency,
            p.signature,
            parts.join(" ")
        );
    }
    out.push('\n');

    out.push_str("Examples:\n");
    for example in ranked
        .iter()
        .filter_map(|p| p.representative_example.as_deref())
        .filter(|e| !e.trim().is_empty())
        .take(MAX_EXAMPLES)
    {
        let _ = writeln!(out, "- {example}");
    }

    out
}
