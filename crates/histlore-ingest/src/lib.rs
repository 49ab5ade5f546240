use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use time::OffsetDateTime;
use tracing::{debug, warn};

use histlore_core::event::{CommandEvent, CommandSource};
use histlore_core::parse::parse_line_with_source;
use histlore_store::HistlorePaths;

// zsh extended history: `: <epoch>:<duration>;<command>`
static ZSH_EXTENDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^: (\d+):\d+;(.+)$").unwrap());

/// One raw line plus whatever source metadata the history format carries.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLine {
    pub line: String,
    pub source: CommandSource,
}

impl HistoryLine {
    fn plain(line: impl Into<String>, shell: &str) -> Self {
        Self {
            line: line.into(),
            source: CommandSource {
                shell: Some(shell.to_string()),
                ..CommandSource::default()
            },
        }
    }
}

/// Gather history lines from the standard locations: `~/.bash_history`,
/// `~/.zsh_history`, fish's history file, and `$HISTFILE` if set.
/// Unreadable or missing files are skipped, never fatal.
pub fn collect_history() -> Vec<HistoryLine> {
    let mut lines = Vec::new();
    if let Some(home) = dirs::home_dir() {
        lines.extend(read_history_file(&home.join(".bash_history"), "bash"));
        lines.extend(read_history_file(&home.join(".zsh_history"), "zsh"));
        lines.extend(read_history_file(
            &home.join(".local/share/fish/fish_history"),
            "fish",
        ));
    }
    if let Ok(histfile) = std::env::var("HISTFILE") {
        if !histfile.trim().is_empty() {
            lines.extend(read_history_file(Path::new(&histfile), "histfile"));
        }
    }
    lines
}

/// Read one history file, decoding its shell-specific framing. Returns an
/// empty vec if the file is absent or unreadable.
pub fn read_history_file(path: &Path, shell: &str) -> Vec<HistoryLine> {
    if !path.is_file() {
        return Vec::new();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), %err, "skipping unreadable history file");
            return Vec::new();
        }
    };
    match shell {
        "zsh" => parse_zsh_history(&content),
        "fish" => parse_fish_history(&content),
        _ => content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| HistoryLine::plain(l, shell))
            .collect(),
    }
}

/// zsh history lines may carry an extended-format timestamp prefix; plain
/// lines pass through unchanged.
fn parse_zsh_history(content: &str) -> Vec<HistoryLine> {
    let mut lines = Vec::new();
    for line in content.lines() {
        if let Some(caps) = ZSH_EXTENDED.captures(line) {
            let cmd = caps[2].trim();
            if cmd.is_empty() {
                continue;
            }
            let timestamp = caps[1]
                .parse::<i64>()
                .ok()
                .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok());
            lines.push(HistoryLine {
                line: cmd.to_string(),
                source: CommandSource {
                    shell: Some("zsh".to_string()),
                    timestamp,
                    ..CommandSource::default()
                },
            });
        } else if !line.trim().is_empty() {
            lines.push(HistoryLine::plain(line, "zsh"));
        }
    }
    lines
}

/// fish stores history as YAML-ish records; only the `- cmd:` line matters
/// here, continuation metadata (`when:`, `paths:`) is dropped.
fn parse_fish_history(content: &str) -> Vec<HistoryLine> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix("- cmd: "))
        .filter(|cmd| !cmd.trim().is_empty())
        .map(|cmd| HistoryLine::plain(cmd.trim(), "fish"))
        .collect()
}

/// Import all discovered history into `raw/imported-<run id>.txt`.
/// Returns the number of lines written; zero means nothing was found and
/// nothing was written.
pub fn import(paths: &HistlorePaths) -> anyhow::Result<usize> {
    paths.ensure_layout()?;
    let lines = collect_history();
    if lines.is_empty() {
        return Ok(0);
    }
    let mut body = String::new();
    for entry in &lines {
        body.push_str(&entry.line);
        body.push('\n');
    }
    let target = paths
        .raw_dir
        .join(format!("imported-{}.txt", histlore_store::run_id()));
    histlore_store::json::write_atomic(&target, body.as_bytes())?;
    Ok(lines.len())
}

/// Produce the event stream for an aggregation run: parse everything under
/// `raw/` if it holds any files, otherwise fall back to auto-detecting the
/// standard history locations. Lines that fail to parse are dropped.
pub fn collect_events(paths: &HistlorePaths) -> anyhow::Result<Vec<CommandEvent>> {
    let raw_lines = read_raw_dir(&paths.raw_dir)?;
    let lines = if raw_lines.is_empty() {
        collect_history()
    } else {
        raw_lines
    };
    Ok(lines
        .into_iter()
        .filter_map(|entry| parse_line_with_source(&entry.line, entry.source))
        .collect())
}

fn read_raw_dir(raw_dir: &Path) -> anyhow::Result<Vec<HistoryLine>> {
    let mut lines = Vec::new();
    if !raw_dir.is_dir() {
        return Ok(lines);
    }
    for path in walk_files(raw_dir)? {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                lines.extend(
                    content
                        .lines()
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| HistoryLine::plain(l, "raw")),
                );
            }
            Err(err) => warn!(path = %path.display(), %err, "skipping unreadable raw file"),
        }
    }
    Ok(lines)
}

fn walk_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zsh_extended_format_extracts_command_and_timestamp() {
        let lines = parse_zsh_history(": 1700000000:0;git status\nplain command\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, "git status");
        assert_eq!(
            lines[0].source.timestamp,
            Some(OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap())
        );
        assert_eq!(lines[1].line, "plain command");
        assert!(lines[1].source.timestamp.is_none());
    }

    #[test]
    fn zsh_blank_and_malformed_extended_lines_skipped() {
        let lines = parse_zsh_history(": 123:0;\n\n: not-extended\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line, ": not-extended");
    }

    #[test]
    fn fish_history_reads_cmd_lines_only() {
        let content = "- cmd: git push\n  when: 1700000000\n- cmd: ls -la\n  paths:\n    - /tmp\n";
        let lines = parse_fish_history(content);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, "git push");
        assert_eq!(lines[1].line, "ls -la");
        assert_eq!(lines[0].source.shell.as_deref(), Some("fish"));
    }

    #[test]
    fn missing_file_yields_nothing() {
        assert!(read_history_file(Path::new("/nonexistent/history"), "bash").is_empty());
    }

    #[test]
    fn plain_history_skips_blank_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history");
        std::fs::write(&path, "ls\n\n  \ngit status\n").unwrap();
        let lines = read_history_file(&path, "bash");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, "ls");
        assert_eq!(lines[1].line, "git status");
    }

    #[test]
    fn collect_events_prefers_raw_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = HistlorePaths::discover(tmp.path());
        paths.ensure_layout().unwrap();
        std::fs::write(paths.raw_dir.join("a.txt"), "git status\nnot empty\n").unwrap();

        let events = collect_events(&paths).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].command, "git");
        assert_eq!(events[0].source.shell.as_deref(), Some("raw"));
    }

    #[test]
    fn raw_dir_is_walked_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = HistlorePaths::discover(tmp.path());
        paths.ensure_layout().unwrap();
        let nested = paths.raw_dir.join("host-a");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("b.txt"), "ls -la\n").unwrap();

        let events = collect_events(&paths).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].command, "ls");
    }
}
