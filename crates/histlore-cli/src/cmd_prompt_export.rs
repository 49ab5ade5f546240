use std::path::Path;

use histlore_report::export::{cap_plan, write_web_prompts};

use crate::workspace;

pub fn execute(
    root: &Path,
    top_commands: Option<usize>,
    top_patterns: Option<usize>,
) -> anyhow::Result<()> {
    let paths = workspace::paths(root);
    let outcome = workspace::load_filtered_patterns(&paths)?;
    let mut plan = workspace::load_plan(&paths)?;
    if let Some(max) = top_commands {
        plan = cap_plan(&outcome.snapshot, &plan, max);
    }

    if plan.commands.is_empty() {
        println!("prompt-export: nothing to export");
        return Ok(());
    }

    write_web_prompts(&paths, &outcome.snapshot, &plan, top_patterns)?;
    println!(
        "prompt-export: wrote {} prompt(s) to {}",
        plan.commands.len(),
        paths.prompts_web_dir.display()
    );
    Ok(())
}
