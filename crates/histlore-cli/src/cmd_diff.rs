use std::path::Path;

use histlore_core::diff::diff;

use crate::workspace;

pub fn execute(root: &Path, top_commands: Option<usize>) -> anyhow::Result<()> {
    let paths = workspace::paths(root);
    let outcome = workspace::load_filtered_patterns(&paths)?;
    if let Some(note) = outcome.note() {
        println!("{note}");
    }

    let prior = histlore_store::load_state(&paths)?;
    let plan = diff(&outcome.snapshot, &prior, top_commands);
    histlore_store::write_json(&paths.regen_plan_json, &plan)?;

    if plan.commands.is_empty() {
        println!("diff: no changes detected");
    } else {
        for item in &plan.commands {
            println!("diff: {} -> {}", item.command, item.reason);
        }
    }
    Ok(())
}
