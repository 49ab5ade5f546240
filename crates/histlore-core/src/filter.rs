use regex::Regex;
use tracing::warn;

use crate::snapshot::PatternsSnapshot;

/// Result of applying command-name exclusion filters: the surviving
/// snapshot plus counts of what was dropped. Filtered commands are reported
/// only in aggregate, never individually.
#[derive(Debug)]
pub struct FilterOutcome {
    pub snapshot: PatternsSnapshot,
    pub commands_filtered: usize,
    pub uses_filtered: u64,
}

impl FilterOutcome {
    /// One-line summary for the CLI, or `None` when nothing was dropped.
    pub fn note(&self) -> Option<String> {
        if self.commands_filtered == 0 {
            return None;
        }
        Some(format!(
            "filters: skipped {} command(s) ({} uses) via config.json",
            self.commands_filtered, self.uses_filtered
        ))
    }
}

/// Drop commands whose display name matches any of the exclusion regexes.
///
/// An invalid pattern is warned about and skipped; it never fails the
/// filtering pass.
pub fn apply_filters(snapshot: PatternsSnapshot, patterns: &[String]) -> FilterOutcome {
    let regexes: Vec<Regex> = patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(pattern, %err, "skipping invalid command filter");
                None
            }
        })
        .collect();

    if regexes.is_empty() {
        return FilterOutcome {
            snapshot,
            commands_filtered: 0,
            uses_filtered: 0,
        };
    }

    let mut filtered = PatternsSnapshot::new(snapshot.generated_at);
    filtered.version = snapshot.version;
    let mut commands_filtered = 0;
    let mut uses_filtered = 0;

    for (key, patterns) in snapshot.commands {
        if regexes.iter().any(|re| re.is_match(&patterns.command)) {
            commands_filtered += 1;
            uses_filtered += patterns.total_uses;
            continue;
        }
        filtered.commands.insert(key, patterns);
    }

    FilterOutcome {
        snapshot: filtered,
        commands_filtered,
        uses_filtered,
    }
}
