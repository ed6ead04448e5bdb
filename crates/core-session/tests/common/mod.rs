#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use core_args::RangeSpec;
use core_session::{
    Collaborators, EditorHost, FarRequest, Prompt, ReplaceEngine, SearchEngine, SessionOptions,
    UndoLog,
};
use core_state::MemorySettings;
use core_view::{Pane, PaneId, ResultsView, TabHost};
use std::collections::VecDeque;

/// Host with a scripted input queue. Closing a pane moves focus to the first
/// remaining pane.
#[derive(Default)]
pub struct RecordingHost {
    pub panes: Vec<Pane>,
    pub current: PaneId,
    pub focus_calls: Vec<PaneId>,
    pub closed: Vec<PaneId>,
    pub errors: Vec<String>,
    pub inputs: VecDeque<String>,
    pub asked: Vec<(String, String)>,
    pub prompts: Vec<Prompt>,
    pub prompt_closed: usize,
}

impl RecordingHost {
    pub fn with_panes(titles: &[&str], current: u32) -> Self {
        Self {
            panes: titles
                .iter()
                .enumerate()
                .map(|(i, t)| Pane::new(PaneId(i as u32), *t))
                .collect(),
            current: PaneId(current),
            ..Self::default()
        }
    }

    pub fn queue_inputs(&mut self, inputs: &[&str]) {
        self.inputs.extend(inputs.iter().map(|s| s.to_string()));
    }
}

impl TabHost for RecordingHost {
    fn panes(&self) -> Vec<Pane> {
        self.panes.clone()
    }
    fn current_pane(&self) -> PaneId {
        self.current
    }
    fn focus(&mut self, pane: PaneId) {
        self.focus_calls.push(pane);
        self.current = pane;
    }
}

impl ResultsView for RecordingHost {
    fn close(&mut self, pane: PaneId) {
        self.closed.push(pane);
        self.panes.retain(|p| p.id != pane);
        if self.current == pane
            && let Some(first) = self.panes.first()
        {
            self.current = first.id;
        }
    }
}

impl EditorHost for RecordingHost {
    fn echo_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
    fn input(&mut self, label: &str, default: &str) -> String {
        self.asked.push((label.to_string(), default.to_string()));
        self.inputs.pop_front().unwrap_or_default()
    }
    fn show_prompt(&mut self, prompt: &Prompt) {
        self.prompts.push(prompt.clone());
    }
    fn close_prompt(&mut self) {
        self.prompt_closed += 1;
    }
}

#[derive(Default)]
pub struct RecordingSearch {
    pub finds: Vec<FarRequest>,
    pub refars: Vec<(RangeSpec, Vec<String>)>,
}

impl SearchEngine for RecordingSearch {
    fn find(&mut self, request: FarRequest) {
        self.finds.push(request);
    }
    fn refar(&mut self, range: RangeSpec, args: Vec<String>) {
        self.refars.push((range, args));
    }
}

#[derive(Default)]
pub struct RecordingReplace {
    pub calls: Vec<(RangeSpec, Vec<String>)>,
}

impl ReplaceEngine for RecordingReplace {
    fn replace(&mut self, range: RangeSpec, args: Vec<String>) {
        self.calls.push((range, args));
    }
}

#[derive(Default)]
pub struct RecordingUndo {
    pub calls: Vec<(RangeSpec, Vec<String>)>,
}

impl UndoLog for RecordingUndo {
    fn undo(&mut self, range: RangeSpec, args: Vec<String>) {
        self.calls.push((range, args));
    }
}

pub struct Fixture {
    pub host: RecordingHost,
    pub search: RecordingSearch,
    pub replace: RecordingReplace,
    pub undo: RecordingUndo,
    pub settings: MemorySettings,
    pub options: SessionOptions,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_panes(&["main.rs"], 0)
    }

    pub fn with_panes(titles: &[&str], current: u32) -> Self {
        Self {
            host: RecordingHost::with_panes(titles, current),
            search: RecordingSearch::default(),
            replace: RecordingReplace::default(),
            undo: RecordingUndo::default(),
            settings: MemorySettings::default(),
            options: SessionOptions::default(),
        }
    }

    pub fn collab(&mut self) -> Collaborators<'_> {
        Collaborators {
            host: &mut self.host,
            search: &mut self.search,
            replace: &mut self.replace,
            undo: &mut self.undo,
            settings: &mut self.settings,
            options: &self.options,
        }
    }

    pub fn only_find(&self) -> &FarRequest {
        assert_eq!(self.search.finds.len(), 1, "expected exactly one dispatch");
        &self.search.finds[0]
    }
}
