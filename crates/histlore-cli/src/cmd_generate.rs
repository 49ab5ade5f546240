use std::path::Path;

use histlore_report::entry::write_placeholder_entries;

use crate::workspace;

pub fn execute(root: &Path, generator: &str, top_patterns: Option<usize>) -> anyhow::Result<()> {
    let dry_run = workspace::check_generator(generator)?;

    let paths = workspace::paths(root);
    let _lock = histlore_store::lock_file(&paths.lock_file)?;
    let outcome = workspace::load_filtered_patterns(&paths)?;
    let plan = workspace::load_plan(&paths)?;

    if plan.commands.is_empty() {
        println!("generate: nothing to do");
        return Ok(());
    }
    if dry_run {
        for item in &plan.commands {
            println!("generate (dry-run): would write {}", item.command);
        }
        return Ok(());
    }

    write_placeholder_entries(&paths, &outcome.snapshot, &plan, top_patterns, generator)?;
    histlore_store::update_state(&paths, &plan)?;
    println!(
        "generate: wrote {} placeholder entr{} and updated state",
        plan.commands.len(),
        if plan.commands.len() == 1 { "y" } else { "ies" }
    );
    Ok(())
}
