use std::sync::LazyLock;

use regex::Regex;

/// Placeholder substituted for credential-looking tokens.
pub const TOKEN_PLACEHOLDER: &str = "<TOKEN>";

static HOME_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/home/[^/]+/").unwrap());

// Long unbroken alphanumeric runs are treated as likely token/credential
// material regardless of context.
static TOKEN_LIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z0-9]{24,}\b").unwrap());

static HOST_USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z0-9_.-]+)@[a-zA-Z0-9_.-]+").unwrap());

/// Redact sensitive material from a raw history line before any other stage
/// sees it. Applied in order: home directories collapse to `~/`, long
/// alphanumeric runs become [`TOKEN_PLACEHOLDER`], and `user@host` collapses
/// to just the user. Token redaction runs before the host collapse so a long
/// hostname cannot survive inside an `@`-pair.
///
/// Pure and total: never fails, never panics on any input line.
pub fn sanitize(line: &str) -> String {
    let trimmed = line.trim();
    let out = HOME_PATH.replace_all(trimmed, "~/");
    let out = TOKEN_LIKE.replace_all(&out, TOKEN_PLACEHOLDER);
    let out = HOST_USER.replace_all(&out, "$1");
    out.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_path_collapsed() {
        assert_eq!(
            sanitize("cat /home/alice/notes.txt"),
            "cat ~/notes.txt"
        );
    }

    #[test]
    fn long_alnum_run_redacted() {
        let line = format!("curl -H {}", "a1B2c3D4e5".repeat(3));
        let out = sanitize(&line);
        assert_eq!(out, format!("curl -H {TOKEN_PLACEHOLDER}"));
    }

    #[test]
    fn short_runs_untouched() {
        assert_eq!(sanitize("git checkout feature123"), "git checkout feature123");
    }

    #[test]
    fn user_at_host_collapsed() {
        assert_eq!(
            sanitize("ssh alice@myhost.example.com"),
            "ssh alice"
        );
    }

    #[test]
    fn redaction_runs_before_host_collapse() {
        // The 30-char hostname is redacted first, so the user survives alone.
        let line = format!("ssh bob@{}", "h".repeat(30));
        let out = sanitize(&line);
        assert!(out.starts_with("ssh bob"));
        assert!(!out.contains("hhhh"));
    }

    #[test]
    fn whitespace_trimmed() {
        assert_eq!(sanitize("  ls -la  "), "ls -la");
    }

    #[test]
    fn empty_line_stays_empty() {
        assert_eq!(sanitize(""), "");
    }
}
