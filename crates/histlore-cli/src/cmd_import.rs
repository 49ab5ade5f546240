use std::path::Path;

use crate::workspace;

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let paths = workspace::paths(root);
    let written = histlore_ingest::import(&paths)?;
    if written == 0 {
        println!("import: no history found");
    } else {
        println!("import: wrote {written} line(s) to {}", paths.raw_dir.display());
    }
    Ok(())
}
