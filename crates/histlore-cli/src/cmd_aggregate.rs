use std::path::Path;

use histlore_core::aggregate::aggregate;
use histlore_core::snapshot::PatternsSnapshot;
use histlore_store::HistlorePaths;

use crate::workspace;

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let paths = workspace::paths(root);
    let _lock = histlore_store::lock_file(&paths.lock_file)?;
    let snapshot = aggregate_workspace(&paths)?;
    println!("aggregate: processed {} line(s)", snapshot.total_uses());
    Ok(())
}

/// Collect events, fold them into a snapshot, and publish it as the live
/// `patterns.json` plus a timestamped copy under `snapshots/`.
pub fn aggregate_workspace(paths: &HistlorePaths) -> anyhow::Result<PatternsSnapshot> {
    paths.ensure_layout()?;
    let events = histlore_ingest::collect_events(paths)?;
    let snapshot = aggregate(events);
    histlore_store::write_json(&paths.patterns_json, &snapshot)?;
    let archive = paths
        .snapshots_dir
        .join(format!("patterns-{}.json", histlore_store::run_id()));
    histlore_store::write_json(&archive, &snapshot)?;
    Ok(snapshot)
}
