use std::path::Path;

use histlore_core::diff::diff;
use histlore_report::entry::write_placeholder_entries;
use histlore_report::prompt::write_prompts;

use crate::{cmd_aggregate, workspace};

/// The whole pipeline, held under one exclusive lock.
pub fn execute(
    root: &Path,
    generator: &str,
    top_commands: Option<usize>,
    top_patterns: Option<usize>,
) -> anyhow::Result<()> {
    let dry_run = workspace::check_generator(generator)?;

    let paths = workspace::paths(root);
    let _lock = histlore_store::lock_file(&paths.lock_file)?;

    let snapshot = cmd_aggregate::aggregate_workspace(&paths)?;
    println!("run: aggregated {} line(s)", snapshot.total_uses());

    let outcome = workspace::filter_patterns(&paths, snapshot)?;
    if let Some(note) = outcome.note() {
        println!("{note}");
    }

    let prior = histlore_store::load_state(&paths)?;
    let plan = diff(&outcome.snapshot, &prior, top_commands);
    histlore_store::write_json(&paths.regen_plan_json, &plan)?;
    println!("run: {} command(s) planned for regeneration", plan.commands.len());

    if plan.commands.is_empty() {
        println!("run: nothing to regenerate");
        return Ok(());
    }

    write_prompts(&paths, &outcome.snapshot, &plan, top_patterns)?;

    if dry_run {
        for item in &plan.commands {
            println!("run (dry-run): would write {}", item.command);
        }
        return Ok(());
    }

    write_placeholder_entries(&paths, &outcome.snapshot, &plan, top_patterns, generator)?;
    histlore_store::update_state(&paths, &plan)?;
    println!("run: completed aggregate -> diff -> prepare -> generate (placeholder)");
    Ok(())
}
