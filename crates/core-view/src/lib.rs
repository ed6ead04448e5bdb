//! Results view bookkeeping for a workspace tab.
//!
//! A results view is any pane whose title contains `FAR <n>`, where `n` is a
//! tab-scoped number chosen by whoever opens the view. At most one may exist
//! per tab. `ensure_singleton` enforces that before a new interactive session
//! claims the slot:
//!
//! 1. scan the panes of the current tab for results titles;
//! 2. note whether the pane the user is in is one of them;
//! 3. close every match through `ResultsView::close`;
//! 4. if the user was elsewhere, put focus back on their pane.
//!
//! Finding more than one match should not happen. It is logged at `warn` and
//! all of them are closed.

pub mod lifecycle;

pub use lifecycle::{LifecycleReport, ensure_singleton};

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RESULTS_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bFAR (\d+)\b").expect("results title pattern is valid")
});

/// Identifier of a pane (window) within the host's current tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub u32);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub id: PaneId,
    pub title: String,
}

impl Pane {
    pub fn new(id: PaneId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    pub fn results_handle(&self) -> Option<ResultsViewHandle> {
        ResultsViewHandle::from_title(&self.title)
    }
}

/// Name of a results view: `FAR <number>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultsViewHandle {
    pub number: u32,
}

impl ResultsViewHandle {
    pub fn new(number: u32) -> Self {
        Self { number }
    }

    pub fn title(&self) -> String {
        format!("FAR {}", self.number)
    }

    pub fn from_title(title: &str) -> Option<Self> {
        RESULTS_TITLE
            .captures(title)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .map(Self::new)
    }
}

/// Pane layout of the host's current tab.
pub trait TabHost {
    fn panes(&self) -> Vec<Pane>;
    fn current_pane(&self) -> PaneId;
    fn focus(&mut self, pane: PaneId);
}

/// Teardown of one results view (buffer state plus its pane).
pub trait ResultsView {
    fn close(&mut self, pane: PaneId);
}
