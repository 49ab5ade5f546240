use std::collections::BTreeMap;
use std::fmt::Write as _;

use histlore_core::snapshot::PatternsSnapshot;
use histlore_store::HistlorePaths;

const DEFAULT_TOP: usize = 20;

/// Limits for the three report tables; `None` falls back to 20.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportLimits {
    pub top_commands: Option<usize>,
    pub top_flags: Option<usize>,
    pub top_options: Option<usize>,
}

/// Build the report and write it to `output/report.txt`, returning the text
/// so the CLI can echo it.
pub fn write_report(
    paths: &HistlorePaths,
    snapshot: &PatternsSnapshot,
    limits: ReportLimits,
) -> anyhow::Result<String> {
    paths.ensure_layout()?;
    let report = build_report(snapshot, limits);
    histlore_store::json::write_atomic(&paths.report_txt, report.as_bytes())?;
    Ok(report)
}

/// Render the human-readable usage summary: totals, then top commands,
/// flags, and options. Flag and option counts are weighted by pattern
/// frequency, not distinct patterns.
pub fn build_report(snapshot: &PatternsSnapshot, limits: ReportLimits) -> String {
    let top_commands = limits.top_commands.unwrap_or(DEFAULT_TOP);
    let top_flags = limits.top_flags.unwrap_or(DEFAULT_TOP);
    let top_options = limits.top_options.unwrap_or(DEFAULT_TOP);

    let mut out = String::new();
    let _ = writeln!(out, "histlore report");
    let generated = snapshot
        .generated_at
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    let _ = writeln!(out, "generated_at: {generated}");
    let _ = writeln!(out, "commands: {}", snapshot.commands.len());
    let _ = writeln!(out, "total_uses: {}", snapshot.total_uses());
    let _ = writeln!(out, "unique_patterns: {}", snapshot.unique_patterns());
    out.push('\n');

    let _ = writeln!(out, "Top commands (limit {top_commands}):");
    let mut commands: Vec<_> = snapshot.commands.values().collect();
    commands.sort_by(|a, b| {
        b.total_uses
            .cmp(&a.total_uses)
            .then_with(|| a.command.cmp(&b.command))
    });
    for (i, c) in commands.iter().take(top_commands).enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} | uses={} | patterns={}",
            i + 1,
            c.command,
            c.total_uses,
            c.patterns.len()
        );
    }
    out.push('\n');

    let mut flag_counts: BTreeMap<&str, u64> = BTreeMap::new();
    let mut option_counts: BTreeMap<&str, u64> = BTreeMap::new();
    for command in snapshot.commands.values() {
        for pattern in &command.patterns {
            for flag in &pattern.flags {
                *flag_counts.entry(flag).or_default() += pattern.frequency;
            }
            for key in pattern.options.keys() {
                *option_counts.entry(key).or_default() += pattern.frequency;
            }
        }
    }

    let _ = writeln!(out, "Top flags (limit {top_flags}):");
    write_count_table(&mut out, &flag_counts, top_flags);
    out.push('\n');

    let _ = writeln!(out, "Top options (limit {top_options}):");
    write_count_table(&mut out, &option_counts, top_options);

    out
}

fn write_count_table(out: &mut String, counts: &BTreeMap<&str, u64>, limit: usize) {
    let mut ordered: Vec<_> = counts.iter().collect();
    ordered.sort_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)));
    for (i, (key, uses)) in ordered.iter().take(limit).enumerate() {
        let _ = writeln!(out, "{:>2}. {} | uses={}", i + 1, key, uses);
    }
}
