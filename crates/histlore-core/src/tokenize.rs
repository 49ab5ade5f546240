/// Split a sanitized line into shell-like tokens.
///
/// Whitespace separates tokens outside quotes. `"` and `'` open a quoted
/// span that ends at the matching quote; the quote characters themselves are
/// not emitted. A backslash followed by any character emits that character
/// literally, inside or outside quotes.
///
/// Deliberately lenient: an unterminated quote or a trailing lone backslash
/// does not fail, the accumulated text is emitted as-is. History files are
/// full of half-typed lines and this stage must never reject one.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_quote = false;
    let mut quote_char = '\0';

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quote {
            if c == quote_char {
                in_quote = false;
            } else if c == '\\' && chars.peek().is_some() {
                buf.push(chars.next().unwrap());
            } else {
                buf.push(c);
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_quote = true;
                quote_char = c;
            }
            c if c.is_whitespace() => {
                if !buf.is_empty() {
                    tokens.push(std::mem::take(&mut buf));
                }
            }
            '\\' if chars.peek().is_some() => {
                buf.push(chars.next().unwrap());
            }
            _ => buf.push(c),
        }
    }

    if !buf.is_empty() {
        tokens.push(buf);
    }
    tokens
}
