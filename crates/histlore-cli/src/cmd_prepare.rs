use std::path::Path;

use histlore_report::prompt::write_prompts;

use crate::workspace;

pub fn execute(root: &Path, top_patterns: Option<usize>) -> anyhow::Result<()> {
    let paths = workspace::paths(root);
    let outcome = workspace::load_filtered_patterns(&paths)?;
    let plan = workspace::load_plan(&paths)?;

    write_prompts(&paths, &outcome.snapshot, &plan, top_patterns)?;
    println!(
        "prepare: wrote {} prompt(s) to {}",
        plan.commands.len(),
        paths.prompts_dir.display()
    );
    Ok(())
}
