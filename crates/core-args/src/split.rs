//! Quote-aware splitting of user-typed argument strings.
//!
//! Rules:
//! * Unquoted whitespace separates tokens; runs of whitespace collapse.
//! * `'...'` and `"..."` group their contents into the current token. The
//!   quotes themselves are dropped, so `""` yields an explicit empty token.
//! * `\"`, `\'`, `\ ` and `\<tab>` produce the escaped character literally.
//!   Any other backslash is kept as-is so regex patterns such as `a\.b`
//!   survive untouched.
//! * An unterminated quote swallows the rest of the input into the trailing
//!   token instead of failing (interactive input is frequently unbalanced).

use tracing::trace;

/// Split `raw` into positional tokens. Never fails; empty input yields an
/// empty vector.
pub fn split_args(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                in_token = true;
                match chars.peek().copied() {
                    Some(next @ ('"' | '\'' | ' ' | '\t')) => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push('\\'),
                }
            }
            '"' | '\'' => {
                in_token = true;
                let quote = ch;
                let mut closed = false;
                while let Some(c) = chars.next() {
                    if c == '\\' && chars.peek() == Some(&quote) {
                        current.push(quote);
                        chars.next();
                        continue;
                    }
                    if c == quote {
                        closed = true;
                        break;
                    }
                    current.push(c);
                }
                if !closed {
                    trace!(target: "args", quote = %quote, "unbalanced_quote_recovered");
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}
