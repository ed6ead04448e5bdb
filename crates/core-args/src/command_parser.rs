//! Structured classification of far command lines.
//!
//! Converts a raw host command line (`:Far foo bar *.rs`, `10,20Farf`,
//! `Fardo`) into a `ParsedCommand`. The optional leading range prefix
//! becomes `RangeArgs`; the argument tail is returned untouched so each
//! entry point can tokenize it with `split_args` on its own terms.
//!
//! * Parsing is synchronous and side-effect free.
//! * Unrecognized names are `ParsedCommand::Unknown(String)`; higher layers
//!   turn them into a status message.
//! * `Far` without arguments is the synchronous prompt, mirroring how the
//!   command behaves when typed bare.

use crate::range::RangeArgs;

/// The seven command names the host exposes (six entry points, with the
/// interactive one split by its initial substitute state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// `F <pattern> [<filemask>] [<param>...]`
    Find,
    /// `Far <pattern> <replace> [<filemask>] [<param>...]`
    Replace,
    /// `Farf` - interactive session, substitute closed.
    FindInteractive,
    /// `Farr` - interactive session, substitute open.
    ReplaceInteractive,
    /// `Farp` (or bare `Far`) - synchronous three-question prompt.
    Prompt,
    /// `Refar` - re-run the last search.
    Refar,
    /// `Fardo` - apply the reviewed replacement batch.
    Fardo,
    /// `Farundo` - undo a replacement batch.
    Farundo,
}

impl EntryPoint {
    pub fn name(&self) -> &'static str {
        match self {
            EntryPoint::Find => "F",
            EntryPoint::Replace => "Far",
            EntryPoint::FindInteractive => "Farf",
            EntryPoint::ReplaceInteractive => "Farr",
            EntryPoint::Prompt => "Farp",
            EntryPoint::Refar => "Refar",
            EntryPoint::Fardo => "Fardo",
            EntryPoint::Farundo => "Farundo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub entry: EntryPoint,
    pub range: RangeArgs,
    /// Raw argument tail with leading whitespace trimmed.
    pub args: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Invocation(Invocation),
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let body = s.strip_prefix(':').unwrap_or(s);
        if body.is_empty() {
            return ParsedCommand::Unknown(String::new());
        }
        let (range, rest) = match parse_range_prefix(body) {
            Some(parsed) => parsed,
            None => return ParsedCommand::Unknown(body.to_string()),
        };
        let name_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (name, tail) = rest.split_at(name_len);
        let args = tail.trim_start().to_string();
        let entry = match name {
            "F" => EntryPoint::Find,
            "Far" if args.is_empty() => EntryPoint::Prompt,
            "Far" => EntryPoint::Replace,
            "Farf" => EntryPoint::FindInteractive,
            "Farr" => EntryPoint::ReplaceInteractive,
            "Farp" => EntryPoint::Prompt,
            "Refar" => EntryPoint::Refar,
            "Fardo" => EntryPoint::Fardo,
            "Farundo" => EntryPoint::Farundo,
            _ => return ParsedCommand::Unknown(body.to_string()),
        };
        ParsedCommand::Invocation(Invocation { entry, range, args })
    }
}

/// Accepts `N` and `N,M` prefixes. Returns `None` for a malformed prefix
/// (e.g. `3,Far`) or a line number beyond `u32`, which the caller reports
/// as unknown.
fn parse_range_prefix(body: &str) -> Option<(RangeArgs, &str)> {
    let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let first_len = digits(body);
    if first_len == 0 {
        return Some((RangeArgs::NONE, body));
    }
    let line1: u32 = body[..first_len].parse().ok()?;
    let rest = &body[first_len..];
    match rest.strip_prefix(',') {
        Some(after_comma) => {
            let second_len = digits(after_comma);
            if second_len == 0 {
                return None;
            }
            let line2: u32 = after_comma[..second_len].parse().ok()?;
            Some((RangeArgs::lines(line1, line2), &after_comma[second_len..]))
        }
        None => Some((RangeArgs::new(1, line1, line1), rest)),
    }
}
