use std::path::Path;

use histlore_report::report::{write_report, ReportLimits};

use crate::workspace;

pub fn execute(root: &Path, limits: ReportLimits) -> anyhow::Result<()> {
    let paths = workspace::paths(root);
    let outcome = workspace::load_filtered_patterns(&paths)?;

    let report = write_report(&paths, &outcome.snapshot, limits)?;
    print!("{report}");
    println!();
    println!("report: written to {}", paths.report_txt.display());
    if let Some(note) = outcome.note() {
        println!("{note}");
    }
    Ok(())
}
