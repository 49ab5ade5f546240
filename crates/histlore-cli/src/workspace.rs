use std::path::Path;

use histlore_core::filter::{apply_filters, FilterOutcome};
use histlore_core::snapshot::PatternsSnapshot;
use histlore_core::state::RegenPlan;
use histlore_store::{AppConfig, HistlorePaths};

/// Resolve workspace paths from the chosen root.
pub fn paths(root: &Path) -> HistlorePaths {
    HistlorePaths::discover(root)
}

/// Read `patterns.json` and apply the configured command filters.
/// Fails when no snapshot has been aggregated yet.
pub fn load_filtered_patterns(paths: &HistlorePaths) -> anyhow::Result<FilterOutcome> {
    let snapshot: PatternsSnapshot = histlore_store::read_json(&paths.patterns_json)?
        .ok_or_else(|| anyhow::anyhow!("patterns.json not found; run `histlore aggregate` first"))?;
    filter_patterns(paths, snapshot)
}

/// Apply the configured command filters to an in-memory snapshot.
pub fn filter_patterns(
    paths: &HistlorePaths,
    snapshot: PatternsSnapshot,
) -> anyhow::Result<FilterOutcome> {
    let config = AppConfig::load(paths)?;
    Ok(apply_filters(snapshot, &config.command_filters))
}

/// Read the regeneration plan written by `diff`.
pub fn load_plan(paths: &HistlorePaths) -> anyhow::Result<RegenPlan> {
    histlore_store::read_json(&paths.regen_plan_json)?
        .ok_or_else(|| anyhow::anyhow!("regen_plan.json not found; run `histlore diff` first"))
}

/// Refuse generator modes this build cannot honor. Only `none` and
/// `dry-run` write anything; external generators are not wired in.
pub fn check_generator(mode: &str) -> anyhow::Result<bool> {
    match mode {
        "none" => Ok(false),
        "dry-run" => Ok(true),
        other => anyhow::bail!(
            "external generator '{other}' not wired; use --generator none or --generator dry-run"
        ),
    }
}
