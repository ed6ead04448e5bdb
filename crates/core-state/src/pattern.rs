//! Pattern normalization.
//!
//! Turns the raw text typed in an interactive session into the pattern the
//! search engine matches with. Steps, in fixed order:
//! 1. regex closed: double every backslash so the body is taken literally.
//! 2. prefix `\C` (case_sensitive open) or `\c` (closed). Always emitted so
//!    the host's ignorecase/smartcase settings never leak in.
//! 3. word open: wrap in `\<` ... `\>`.
//! 4. regex closed: prefix `\V` outermost. The markers added in steps 2-3
//!    are engine directives and remain active under very-literal mode.
//!
//! `raw = a.b`, `{regex: off, case: on, word: on}` gives `\V\<\Ca.b\>`.

use crate::{Mode, ModeState};

pub const CASE_SENSITIVE_MARKER: &str = r"\C";
pub const CASE_INSENSITIVE_MARKER: &str = r"\c";
pub const WORD_START: &str = r"\<";
pub const WORD_END: &str = r"\>";
pub const VERY_LITERAL_MARKER: &str = r"\V";

pub fn normalize_pattern(raw: &str, modes: &ModeState) -> String {
    let literal = !modes.is_open(Mode::Regex);
    let body = if literal {
        escape_backslashes(raw)
    } else {
        raw.to_string()
    };

    let case_marker = if modes.is_open(Mode::CaseSensitive) {
        CASE_SENSITIVE_MARKER
    } else {
        CASE_INSENSITIVE_MARKER
    };
    let mut pattern = String::with_capacity(body.len() + 10);
    pattern.push_str(case_marker);
    pattern.push_str(&body);

    if modes.is_open(Mode::Word) {
        pattern = format!("{WORD_START}{pattern}{WORD_END}");
    }
    if literal {
        pattern.insert_str(0, VERY_LITERAL_MARKER);
    }
    pattern
}

/// Characters the engine expands inside replacement text: backslash
/// sequences (`\1`, `\n`), `&` (whole match) and `~` (previous replacement).
pub const REPLACEMENT_SPECIALS: [char; 3] = ['\\', '&', '~'];

/// With regex mode closed every replacement special is backslash-escaped so
/// the text is inserted literally. With regex open the text passes through.
/// No markers are added.
pub fn normalize_replacement(raw: &str, modes: &ModeState) -> String {
    if modes.is_open(Mode::Regex) {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len() + 4);
    for ch in raw.chars() {
        if REPLACEMENT_SPECIALS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn escape_backslashes(s: &str) -> String {
    s.replace('\\', r"\\")
}
