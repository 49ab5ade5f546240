use time::OffsetDateTime;

use crate::event::CommandEvent;
use crate::signature::build_signature;
use crate::snapshot::{CommandPatterns, PatternsSnapshot};

/// Fold a sequence of events into a fresh [`PatternsSnapshot`].
///
/// The fold is strictly sequential: find-or-create on the per-command map
/// and the per-signature list is not safe under concurrent interleaving.
/// Counts and hashes are independent of arrival order;
/// `representative_example` and the seen-timestamps are "first/extremes
/// observed" and intentionally are not.
pub fn aggregate<I>(events: I) -> PatternsSnapshot
where
    I: IntoIterator<Item = CommandEvent>,
{
    aggregate_at(events, OffsetDateTime::now_utc())
}

/// [`aggregate`] with an explicit snapshot timestamp, for deterministic tests.
pub fn aggregate_at<I>(events: I, generated_at: OffsetDateTime) -> PatternsSnapshot
where
    I: IntoIterator<Item = CommandEvent>,
{
    let mut snapshot = PatternsSnapshot::new(generated_at);
    for event in events {
        fold_event(&mut snapshot, &event);
    }
    snapshot
}

/// Apply a single event to a snapshot under construction.
pub fn fold_event(snapshot: &mut PatternsSnapshot, event: &CommandEvent) {
    let entry = snapshot
        .commands
        .entry(event.key())
        .or_insert_with(|| CommandPatterns::new(event.command.clone()));
    entry.total_uses += 1;

    let signature = build_signature(event);
    let idx = match entry
        .patterns
        .iter()
        .position(|p| p.signature == signature.signature)
    {
        Some(idx) => idx,
        None => {
            entry.patterns.push(signature);
            entry.patterns.len() - 1
        }
    };

    let pattern = &mut entry.patterns[idx];
    pattern.frequency += 1;
    if pattern.representative_example.is_none() {
        pattern.representative_example = Some(event.raw.clone());
    }
    if let Some(ts) = event.source.timestamp {
        pattern.first_seen = Some(pattern.first_seen.map_or(ts, |seen| seen.min(ts)));
        pattern.last_seen = Some(pattern.last_seen.map_or(ts, |seen| seen.max(ts)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CommandSource;
    use crate::parse::{parse_line, parse_line_with_source};

    fn events(lines: &[&str]) -> Vec<CommandEvent> {
        lines.iter().filter_map(|l| parse_line(l)).collect()
    }

    fn snap(lines: &[&str]) -> PatternsSnapshot {
        aggregate_at(events(lines), OffsetDateTime::UNIX_EPOCH)
    }

    #[test]
    fn total_uses_equals_sum_of_frequencies() {
        let snapshot = snap(&[
            "git status",
            "git status",
            "git commit -m one",
            "ls -la /tmp",
            "git push origin main",
        ]);
        for patterns in snapshot.commands.values() {
            let freq_sum: u64 = patterns.patterns.iter().map(|p| p.frequency).sum();
            assert_eq!(patterns.total_uses, freq_sum);
        }
        assert_eq!(snapshot.total_uses(), 5);
    }

    #[test]
    fn same_shape_collapses_to_one_pattern() {
        let snapshot = snap(&["cp -r /a/b /c/d", "cp -r /x/y /z/w"]);
        let cp = &snapshot.commands["cp"];
        assert_eq!(cp.total_uses, 2);
        assert_eq!(cp.patterns.len(), 1);
        assert_eq!(cp.patterns[0].frequency, 2);
    }

    #[test]
    fn command_grouping_is_case_insensitive() {
        let snapshot = snap(&["Git status", "git status"]);
        assert_eq!(snapshot.commands.len(), 1);
        let git = &snapshot.commands["git"];
        // First-seen spelling is the display name.
        assert_eq!(git.command, "Git");
        assert_eq!(git.total_uses, 2);
    }

    #[test]
    fn representative_example_is_first_seen() {
        let snapshot = snap(&["cp -r /a/b /c/d", "cp -r /x/y /z/w"]);
        let cp = &snapshot.commands["cp"];
        assert_eq!(
            cp.patterns[0].representative_example.as_deref(),
            Some("cp -r /a/b /c/d")
        );
    }

    #[test]
    fn seen_range_widens_from_source_timestamps() {
        let at = |secs: i64| CommandSource {
            timestamp: Some(OffsetDateTime::from_unix_timestamp(secs).unwrap()),
            ..CommandSource::default()
        };
        let evts = vec![
            parse_line_with_source("ls -la", at(200)).unwrap(),
            parse_line_with_source("ls -la", at(100)).unwrap(),
            parse_line_with_source("ls -la", at(300)).unwrap(),
        ];
        let snapshot = aggregate_at(evts, OffsetDateTime::UNIX_EPOCH);
        let pattern = &snapshot.commands["ls"].patterns[0];
        assert_eq!(
            pattern.first_seen,
            Some(OffsetDateTime::from_unix_timestamp(100).unwrap())
        );
        assert_eq!(
            pattern.last_seen,
            Some(OffsetDateTime::from_unix_timestamp(300).unwrap())
        );
    }

    #[test]
    fn reaggregation_is_idempotent_on_counts_and_hashes() {
        let lines = [
            "git commit -m msg",
            "curl --retry 3 https://x.com",
            "git commit -m other",
            "ls -la /tmp",
        ];
        let a = snap(&lines);
        let shuffled = ["ls -la /tmp", "git commit -m other", "curl --retry 3 https://x.com", "git commit -m msg"];
        let b = snap(&shuffled);

        assert_eq!(a.commands.len(), b.commands.len());
        for (key, ca) in &a.commands {
            let cb = &b.commands[key];
            assert_eq!(ca.total_uses, cb.total_uses);
            let mut sigs_a: Vec<_> = ca.patterns.iter().map(|p| (&p.signature, p.frequency)).collect();
            let mut sigs_b: Vec<_> = cb.patterns.iter().map(|p| (&p.signature, p.frequency)).collect();
            sigs_a.sort();
            sigs_b.sort();
            assert_eq!(sigs_a, sigs_b);
        }
    }

    #[test]
    fn empty_input_yields_empty_snapshot() {
        let snapshot = snap(&[]);
        assert!(snapshot.commands.is_empty());
        assert_eq!(snapshot.version, crate::SCHEMA_VERSION);
    }
}
