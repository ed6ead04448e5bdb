//! Session-scoped search state: mode toggles, pattern normalization and the
//! default file mask store.
//!
//! Modes:
//! - `Mode` is a closed set (`Substitute`, `Regex`, `CaseSensitive`, `Word`);
//!   misspelled mode names are rejected at the string boundary
//!   (`Mode::from_name`) instead of being silently ignored deep inside.
//! - `ModeState` carries two flag sets: `open` (current value of each mode)
//!   and `fix` (modes locked for the rest of the session). A fixed mode keeps
//!   its value; toggles against it are dropped and traced.
//! - A `ModeState` belongs to exactly one interactive session. Sessions build
//!   a fresh one via `ModeState::for_session`, so toggles never leak from one
//!   invocation into the next.
//!
//! Default file mask:
//! - The only value that outlives a session. It lives behind the
//!   `SettingsStore` trait so the host (or a test) decides where it is kept.

pub mod pattern;
pub mod settings;

pub use pattern::{
    CASE_INSENSITIVE_MARKER, CASE_SENSITIVE_MARKER, VERY_LITERAL_MARKER, WORD_END, WORD_START,
    normalize_pattern, normalize_replacement,
};
pub use settings::{DEFAULT_FILE_MASK, MemorySettings, SettingsStore};

use tracing::debug;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModeSet: u8 {
        const SUBSTITUTE     = 0b0000_0001;
        const REGEX          = 0b0000_0010;
        const CASE_SENSITIVE = 0b0000_0100;
        const WORD           = 0b0000_1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Substitute,
    Regex,
    CaseSensitive,
    Word,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Substitute, Mode::Regex, Mode::CaseSensitive, Mode::Word];

    pub const fn flag(self) -> ModeSet {
        match self {
            Mode::Substitute => ModeSet::SUBSTITUTE,
            Mode::Regex => ModeSet::REGEX,
            Mode::CaseSensitive => ModeSet::CASE_SENSITIVE,
            Mode::Word => ModeSet::WORD,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Substitute => "substitute",
            Mode::Regex => "regex",
            Mode::CaseSensitive => "case_sensitive",
            Mode::Word => "word",
        }
    }

    /// Accepts the canonical names plus the short `case` alias used by
    /// prompt toggles.
    pub fn from_name(name: &str) -> Option<Mode> {
        match name {
            "substitute" => Some(Mode::Substitute),
            "regex" => Some(Mode::Regex),
            "case_sensitive" | "case" => Some(Mode::CaseSensitive),
            "word" => Some(Mode::Word),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    fix: ModeSet,
    open: ModeSet,
}

impl ModeState {
    /// State with the given open modes and nothing fixed.
    pub fn new(open: ModeSet) -> Self {
        Self {
            fix: ModeSet::empty(),
            open,
        }
    }

    /// Fresh state for one interactive session: nothing fixed (so
    /// `substitute` starts unlocked), the caller's defaults open, and the
    /// substitute value supplied by the entry command.
    pub fn for_session(defaults: ModeSet, substitute_open: bool) -> Self {
        let mut state = Self::new(defaults);
        state.set_open(Mode::Substitute, substitute_open);
        state
    }

    pub fn is_fixed(&self, mode: Mode) -> bool {
        self.fix.contains(mode.flag())
    }

    pub fn is_open(&self, mode: Mode) -> bool {
        self.open.contains(mode.flag())
    }

    pub fn set_open(&mut self, mode: Mode, value: bool) {
        self.open.set(mode.flag(), value);
    }

    pub fn set_fixed(&mut self, mode: Mode, value: bool) {
        self.fix.set(mode.flag(), value);
    }

    /// Flip `mode` unless it is fixed. Returns whether the toggle applied.
    pub fn toggle(&mut self, mode: Mode) -> bool {
        if self.is_fixed(mode) {
            debug!(target: "state.mode", mode = mode.name(), "toggle_ignored_fixed");
            return false;
        }
        self.open.toggle(mode.flag());
        debug!(
            target: "state.mode",
            mode = mode.name(),
            open = self.is_open(mode),
            "mode_toggled"
        );
        true
    }

    pub fn open_set(&self) -> ModeSet {
        self.open
    }
}
