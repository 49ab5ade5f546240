use time::OffsetDateTime;
use tracing::debug;

use histlore_core::event::command_key;
use histlore_core::state::{RegenPlan, StateEntry, StateSnapshot};

use crate::json::{read_json, write_json};
use crate::paths::HistlorePaths;

/// Load the persisted diff baseline. A missing `state.json` means "every
/// command is new" and yields an empty state, not an error.
pub fn load_state(paths: &HistlorePaths) -> anyhow::Result<StateSnapshot> {
    Ok(read_json(&paths.state_json)?.unwrap_or_else(StateSnapshot::empty))
}

/// Record the outcome of a generation pass: for every planned command,
/// remember the patterns hash it was generated from and where its entry
/// lives, then rewrite `state.json` atomically.
pub fn update_state(paths: &HistlorePaths, plan: &RegenPlan) -> anyhow::Result<StateSnapshot> {
    let now = OffsetDateTime::now_utc();
    let mut state = read_json::<StateSnapshot>(&paths.state_json)?
        .unwrap_or_else(|| StateSnapshot::new(now));

    for item in &plan.commands {
        state.commands.insert(
            command_key(&item.command),
            StateEntry {
                patterns_hash: item.patterns_hash.clone(),
                entry_path: Some(paths.entry_path(&item.command).display().to_string()),
                generated_at: Some(now),
            },
        );
    }

    state.generated_at = now;
    write_json(&paths.state_json, &state)?;
    debug!(
        commands = plan.commands.len(),
        path = %paths.state_json.display(),
        "state rewritten"
    );
    Ok(state)
}
