use time::OffsetDateTime;

use crate::canon::canonical_hash;
use crate::event::command_key;
use crate::snapshot::{CommandPatterns, PatternsSnapshot};
use crate::state::{RegenItem, RegenPlan, RegenReason, StateSnapshot};

/// Compare a freshly aggregated snapshot against the prior persisted state
/// and produce the regeneration plan.
///
/// Commands are visited by `total_uses` descending (ties broken by name,
/// ordinal), optionally truncated to the top `limit`, and the plan keeps
/// that order. A command absent from the prior state is `new_command`; one
/// whose content hash moved is `patterns_changed`; a matching hash emits
/// nothing.
pub fn diff(
    current: &PatternsSnapshot,
    prior: &StateSnapshot,
    limit: Option<usize>,
) -> RegenPlan {
    diff_at(current, prior, limit, OffsetDateTime::now_utc())
}

/// [`diff`] with an explicit plan timestamp, for deterministic tests.
///
/// The name tie-break compares the lowercase canonical key, not the
/// first-seen display spelling carried on the emitted items.
pub fn diff_at(
    current: &PatternsSnapshot,
    prior: &StateSnapshot,
    limit: Option<usize>,
    generated_at: OffsetDateTime,
) -> RegenPlan {
    let mut plan = RegenPlan::new(generated_at);

    let mut ordered: Vec<(&String, &CommandPatterns)> = current.commands.iter().collect();
    ordered.sort_by(|(ka, a), (kb, b)| {
        b.total_uses.cmp(&a.total_uses).then_with(|| ka.cmp(kb))
    });
    if let Some(limit) = limit {
        ordered.truncate(limit);
    }

    for (key, patterns) in ordered {
        let hash = compute_patterns_hash(patterns);
        match prior.commands.get(key) {
            None => plan.commands.push(RegenItem {
                command: patterns.command.clone(),
                reason: RegenReason::NewCommand,
                patterns_hash: hash,
            }),
            Some(entry) if entry.patterns_hash != hash => plan.commands.push(RegenItem {
                command: patterns.command.clone(),
                reason: RegenReason::PatternsChanged,
                patterns_hash: hash,
            }),
            Some(_) => {}
        }
    }

    plan
}

/// Content hash over a command's whole usage profile.
///
/// Coarser than the per-pattern signature: it answers "has anything about
/// how this command is used changed since documentation was last
/// generated". Patterns are sorted by signature so aggregation order cannot
/// leak into the hash; frequency and the observational fields
/// (`representative_example`, seen-timestamps) are deliberately excluded
/// except for `total_uses`.
pub fn compute_patterns_hash(patterns: &CommandPatterns) -> String {
    let mut sorted: Vec<_> = patterns.patterns.iter().collect();
    sorted.sort_by(|a, b| a.signature.cmp(&b.signature));

    let canonical = serde_json::json!({
        "command": command_key(&patterns.command),
        "totalUses": patterns.total_uses,
        "patterns": sorted
            .iter()
            .map(|p| {
                serde_json::json!({
                    "signature": p.signature,
                    "subcommand": p.subcommand,
                    "flags": p.flags,
                    "options": p.options,
                    "argShapes": p.arg_shapes,
                })
            })
            .collect::<Vec<_>>(),
    });
    canonical_hash(&canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_at;
    use crate::parse::parse_line;
    use crate::state::StateEntry;

    fn snap(lines: &[&str]) -> PatternsSnapshot {
        aggregate_at(
            lines.iter().filter_map(|l| parse_line(l)),
            OffsetDateTime::UNIX_EPOCH,
        )
    }

    fn plan_of(current: &PatternsSnapshot, prior: &StateSnapshot, limit: Option<usize>) -> RegenPlan {
        diff_at(current, prior, limit, OffsetDateTime::UNIX_EPOCH)
    }

    #[test]
    fn everything_new_against_empty_state() {
        let current = snap(&["git status", "ls -la"]);
        let plan = plan_of(&current, &StateSnapshot::empty(), None);
        assert_eq!(plan.commands.len(), 2);
        assert!(plan
            .commands
            .iter()
            .all(|item| item.reason == RegenReason::NewCommand));
    }

    #[test]
    fn matching_hash_emits_nothing() {
        let current = snap(&["git status", "ls -la"]);
        let mut prior = StateSnapshot::empty();
        for (key, patterns) in &current.commands {
            prior.commands.insert(
                key.clone(),
                StateEntry {
                    patterns_hash: compute_patterns_hash(patterns),
                    entry_path: None,
                    generated_at: None,
                },
            );
        }
        let plan = plan_of(&current, &prior, None);
        assert!(plan.commands.is_empty());
    }

    #[test]
    fn new_command_detected_beside_unchanged_one() {
        let current = snap(&["git status", "ls -la"]);
        let mut prior = StateSnapshot::empty();
        prior.commands.insert(
            "git".into(),
            StateEntry {
                patterns_hash: compute_patterns_hash(&current.commands["git"]),
                entry_path: None,
                generated_at: None,
            },
        );
        let plan = plan_of(&current, &prior, None);
        assert_eq!(plan.commands.len(), 1);
        assert_eq!(plan.commands[0].command, "ls");
        assert_eq!(plan.commands[0].reason, RegenReason::NewCommand);
    }

    #[test]
    fn changed_profile_detected() {
        let before = snap(&["git status"]);
        let mut prior = StateSnapshot::empty();
        prior.commands.insert(
            "git".into(),
            StateEntry {
                patterns_hash: compute_patterns_hash(&before.commands["git"]),
                entry_path: None,
                generated_at: None,
            },
        );
        let after = snap(&["git status", "git push origin main"]);
        let plan = plan_of(&after, &prior, None);
        assert_eq!(plan.commands.len(), 1);
        assert_eq!(plan.commands[0].reason, RegenReason::PatternsChanged);
    }

    #[test]
    fn plan_ordered_by_uses_descending() {
        let current = snap(&["ls", "git status", "git status", "git push"]);
        let plan = plan_of(&current, &StateSnapshot::empty(), None);
        let names: Vec<_> = plan.commands.iter().map(|i| i.command.as_str()).collect();
        assert_eq!(names, ["git", "ls"]);
    }

    #[test]
    fn ties_broken_by_name() {
        let current = snap(&["beta x", "alpha y"]);
        let plan = plan_of(&current, &StateSnapshot::empty(), None);
        let names: Vec<_> = plan.commands.iter().map(|i| i.command.as_str()).collect();
        assert_eq!(names, ["alpha", "beta"]);
    }

    #[test]
    fn ties_broken_by_canonical_key_not_display_spelling() {
        // Ordinal order of the display names would put "Zeta" first.
        let current = snap(&["Zeta x", "alpha y"]);
        let plan = plan_of(&current, &StateSnapshot::empty(), None);
        let names: Vec<_> = plan.commands.iter().map(|i| i.command.as_str()).collect();
        assert_eq!(names, ["alpha", "Zeta"]);
    }

    #[test]
    fn limit_truncates_to_top_commands() {
        let current = snap(&["ls", "git status", "git status", "rm -rf /tmp/x"]);
        let plan = plan_of(&current, &StateSnapshot::empty(), Some(1));
        assert_eq!(plan.commands.len(), 1);
        assert_eq!(plan.commands[0].command, "git");
    }

    #[test]
    fn patterns_hash_ignores_aggregation_order() {
        let a = snap(&["git status", "git push origin main"]);
        let b = snap(&["git push origin main", "git status"]);
        assert_eq!(
            compute_patterns_hash(&a.commands["git"]),
            compute_patterns_hash(&b.commands["git"])
        );
    }

    #[test]
    fn patterns_hash_uses_canonical_key_not_display_name() {
        // The display name depends on which spelling arrived first; the
        // content hash must not.
        let current = snap(&["git status"]);
        let mut respelled = current.commands["git"].clone();
        respelled.command = "Git".into();
        assert_eq!(
            compute_patterns_hash(&current.commands["git"]),
            compute_patterns_hash(&respelled)
        );
    }
}
