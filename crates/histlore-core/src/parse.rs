use std::collections::BTreeMap;

use crate::event::{CommandEvent, CommandSource};
use crate::sanitize::sanitize;
use crate::tokenize::tokenize;

/// Privilege-escalation prefixes dropped before the command token.
const ESCALATION_PREFIXES: &[&str] = &["sudo", "doas"];

/// Parse one raw history line into a [`CommandEvent`].
///
/// Returns `None` for blank or structurally empty lines. This is the whole
/// failure contract: a line that cannot be parsed is dropped, it never
/// aborts the run (the caller's only reaction to `None` is to skip).
pub fn parse_line(line: &str) -> Option<CommandEvent> {
    parse_line_with_source(line, CommandSource::default())
}

/// Like [`parse_line`], attaching source metadata from the import boundary.
pub fn parse_line_with_source(line: &str, source: CommandSource) -> Option<CommandEvent> {
    let sanitized = sanitize(line);
    if sanitized.trim().is_empty() {
        return None;
    }

    let mut tokens = tokenize(&sanitized);
    if tokens.is_empty() {
        return None;
    }

    if ESCALATION_PREFIXES.contains(&tokens[0].as_str()) {
        tokens.remove(0);
    }
    if tokens.is_empty() {
        return None;
    }

    let mut cursor = 0;
    let command = tokens[cursor].clone();
    cursor += 1;

    let mut subcommand = None;
    if cursor < tokens.len() && !is_flag(&tokens[cursor]) {
        subcommand = Some(tokens[cursor].clone());
        cursor += 1;
    }

    let mut flags = Vec::new();
    let mut options = BTreeMap::new();
    let mut arguments = Vec::new();

    while cursor < tokens.len() {
        let token = &tokens[cursor];

        if let Some((key, value)) = split_long_option(token) {
            options.insert(key.to_string(), value.to_string());
            cursor += 1;
            continue;
        }

        if is_flag(token) {
            // Heuristic: a long flag immediately followed by a non-flag token
            // is read as `--key value`. Short flags never consume a value.
            if token.starts_with("--")
                && cursor + 1 < tokens.len()
                && !is_flag(&tokens[cursor + 1])
            {
                options.insert(token.clone(), tokens[cursor + 1].clone());
                cursor += 2;
                continue;
            }
            // Flags are a distinct set; repeats collapse.
            if !flags.contains(token) {
                flags.push(token.clone());
            }
            cursor += 1;
            continue;
        }

        arguments.push(token.clone());
        cursor += 1;
    }

    Some(CommandEvent {
        command,
        subcommand,
        flags,
        options,
        arguments,
        raw: sanitized,
        source,
    })
}

/// A flag-shaped token starts with `-` and is more than the dash itself.
fn is_flag(token: &str) -> bool {
    token.starts_with('-') && token.len() > 1
}

/// Split `--key=value` into its parts. Anything else returns `None`.
fn split_long_option(token: &str) -> Option<(&str, &str)> {
    if !token.starts_with("--") {
        return None;
    }
    token.split_once('=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_is_none() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn bare_sudo_is_none() {
        assert!(parse_line("sudo").is_none());
    }

    #[test]
    fn escalation_prefix_dropped() {
        let evt = parse_line("sudo apt install ripgrep").unwrap();
        assert_eq!(evt.command, "apt");
        assert_eq!(evt.subcommand.as_deref(), Some("install"));
        assert_eq!(evt.arguments, ["ripgrep"]);

        let evt = parse_line("doas reboot").unwrap();
        assert_eq!(evt.command, "reboot");
    }

    #[test]
    fn subcommand_only_when_not_flag_shaped() {
        let evt = parse_line("git status").unwrap();
        assert_eq!(evt.subcommand.as_deref(), Some("status"));

        let evt = parse_line("ls -la /tmp").unwrap();
        assert_eq!(evt.command, "ls");
        assert_eq!(evt.subcommand, None);
        assert_eq!(evt.flags, ["-la"]);
        assert_eq!(evt.arguments, ["/tmp"]);
    }

    #[test]
    fn long_option_with_equals() {
        let evt = parse_line("curl url --retry=3").unwrap();
        assert_eq!(evt.options.get("--retry").map(String::as_str), Some("3"));
    }

    #[test]
    fn long_option_consumes_following_value() {
        let evt = parse_line("curl --retry 3 url").unwrap();
        assert_eq!(evt.subcommand, None);
        assert_eq!(evt.options.get("--retry").map(String::as_str), Some("3"));
        assert_eq!(evt.arguments, ["url"]);
    }

    #[test]
    fn short_flag_never_consumes_value() {
        let evt = parse_line("grep -e pattern file.txt").unwrap();
        assert_eq!(evt.subcommand, None);
        assert_eq!(evt.flags, ["-e"]);
        assert_eq!(evt.arguments, ["pattern", "file.txt"]);
    }

    #[test]
    fn quoted_message_stays_one_argument() {
        let evt = parse_line(r#"git commit -m "fix: a b""#).unwrap();
        assert_eq!(evt.command, "git");
        assert_eq!(evt.subcommand.as_deref(), Some("commit"));
        assert_eq!(evt.flags, ["-m"]);
        assert_eq!(evt.arguments, ["fix: a b"]);
    }

    #[test]
    fn raw_is_sanitized() {
        let evt = parse_line("cat /home/alice/notes.txt").unwrap();
        assert_eq!(evt.raw, "cat ~/notes.txt");
        assert_eq!(evt.arguments, ["~/notes.txt"]);
    }

    #[test]
    fn repeated_flag_kept_once() {
        let evt = parse_line("ls -l -a -l").unwrap();
        assert_eq!(evt.flags, ["-l", "-a"]);
    }

    #[test]
    fn lone_dash_is_positional() {
        let evt = parse_line("cmd sub -").unwrap();
        assert_eq!(evt.arguments, ["-"]);
        assert!(evt.flags.is_empty());
    }
}
