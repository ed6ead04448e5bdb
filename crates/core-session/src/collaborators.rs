//! Seams to the services this crate drives but does not implement.
//!
//! All methods are infallible from our side: engines own their I/O failure
//! handling and report through the host themselves.

use crate::request::FarRequest;
use crate::session::Prompt;
use core_args::RangeSpec;
use core_config::Config;
use core_state::{ModeSet, SettingsStore};
use core_view::{ResultsView, TabHost};

/// Runs searches and populates a results view. Population may complete
/// after `find` returns (e.g. on the host's next redraw).
pub trait SearchEngine {
    fn find(&mut self, request: FarRequest);
    /// Re-run the last search, optionally rescoped.
    fn refar(&mut self, range: RangeSpec, args: Vec<String>);
}

/// Writes the reviewed replacement batch into documents. Arguments are
/// opaque to this crate.
pub trait ReplaceEngine {
    fn replace(&mut self, range: RangeSpec, args: Vec<String>);
}

/// Reverts a previously applied replacement batch. Arguments are opaque to
/// this crate.
pub trait UndoLog {
    fn undo(&mut self, range: RangeSpec, args: Vec<String>);
}

/// The editor embedding us: pane layout, results view teardown, the message
/// line and prompt widgets.
pub trait EditorHost: TabHost + ResultsView {
    /// Show one error line to the user.
    fn echo_error(&mut self, message: &str);
    /// Blocking one-line input with `default` pre-filled. Cancel yields "".
    fn input(&mut self, label: &str, default: &str) -> String;
    /// Open or refresh the interactive prompt for the current step.
    fn show_prompt(&mut self, _prompt: &Prompt) {}
    /// Tear the interactive prompt down.
    fn close_prompt(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptLabels {
    pub pattern: String,
    pub replace: String,
    pub file_mask: String,
}

impl Default for PromptLabels {
    fn default() -> Self {
        Self::from(&core_config::PromptConfig::default())
    }
}

impl From<&core_config::PromptConfig> for PromptLabels {
    fn from(cfg: &core_config::PromptConfig) -> Self {
        Self {
            pattern: cfg.pattern.clone(),
            replace: cfg.replace.clone(),
            file_mask: cfg.file_mask.clone(),
        }
    }
}

/// Configuration-derived knobs shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Open modes at the start of each interactive session (substitute is
    /// always supplied by the entry command).
    pub initial_modes: ModeSet,
    /// `false` adds the no-preview directive to every find.
    pub preview: bool,
    pub labels: PromptLabels,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            initial_modes: ModeSet::empty(),
            preview: true,
            labels: PromptLabels::default(),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            initial_modes: cfg.initial_modes(),
            preview: cfg.file.results.preview,
            labels: PromptLabels::from(&cfg.file.prompt),
        }
    }
}

/// Everything an entry point needs, borrowed for the duration of one call.
pub struct Collaborators<'a> {
    pub host: &'a mut dyn EditorHost,
    pub search: &'a mut dyn SearchEngine,
    pub replace: &'a mut dyn ReplaceEngine,
    pub undo: &'a mut dyn UndoLog,
    pub settings: &'a mut dyn SettingsStore,
    pub options: &'a SessionOptions,
}
