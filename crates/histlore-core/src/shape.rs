use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// Abstract shape of a literal argument or option value.
///
/// Shapes generalize over concrete values so that `cp a.txt b.txt` and
/// `cp x.log y.log` collapse to the same usage pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Url,
    Path,
    Number,
    Addr,
    Word,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shape::Url => "url",
            Shape::Path => "path",
            Shape::Number => "number",
            Shape::Addr => "addr",
            Shape::Word => "word",
        };
        f.write_str(s)
    }
}

/// Classify a literal token into its [`Shape`]. Pure and total.
///
/// The check order is load-bearing: URLs contain `/` and addresses may
/// contain digits, so `url` must win over `path` and `number` over `addr`.
pub fn classify(token: &str) -> Shape {
    if token.trim().is_empty() {
        return Shape::Word;
    }
    let lower = token.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Shape::Url;
    }
    if token.contains('/') || token.starts_with('~') {
        return Shape::Path;
    }
    if NUMBER.is_match(token) {
        return Shape::Number;
    }
    if token.contains('@') {
        return Shape::Addr;
    }
    Shape::Word
}
