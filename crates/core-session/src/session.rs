//! Interactive session state machine.
//!
//! ```text
//! Idle -> AwaitPattern -> [AwaitReplacement] -> AwaitFileMask -> Dispatched
//!              \                  \                   \
//!               +------------------+-------------------+--> Aborted
//! ```
//!
//! * `AwaitReplacement` is only visited when substitute is open once the
//!   pattern is confirmed. Leaving `AwaitPattern` fixes substitute, so it
//!   can no longer be toggled for the rest of the session.
//! * With substitute closed the replacement is the final pattern and the
//!   no-preview directive is appended to the extra arguments.
//! * Empty input (or cancel) at any step aborts. Toggles already applied are
//!   kept in `modes()`; the session object is dropped afterwards, so nothing
//!   carries into the next session.
//! * The pattern is normalized at dispatch with the final modes, so toggles
//!   made during later steps still count.
//!
//! `Session` performs no I/O; `commands::feed` applies the resulting `Step`
//! to the host.

use crate::collaborators::{PromptLabels, SessionOptions};
use crate::error::FarError;
use crate::request::FarRequest;
use core_args::RangeSpec;
use core_state::{Mode, ModeState, normalize_pattern, normalize_replacement};
use core_view::PaneId;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitPattern,
    AwaitReplacement,
    AwaitFileMask,
    Dispatched,
    Aborted,
}

impl SessionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Dispatched | SessionState::Aborted)
    }
}

/// One user action inside a prompt step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Toggle(Mode),
    Submit(String),
    Cancel,
}

/// Result of advancing the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(SessionState),
    Abort(FarError),
    Dispatch(FarRequest),
}

/// What the host should render for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub state: SessionState,
    pub label: String,
    pub default: String,
    pub modes: ModeState,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    modes: ModeState,
    range: RangeSpec,
    extra_args: Vec<String>,
    pattern: Option<String>,
    replacement: Option<String>,
    default_mask: String,
    preview: bool,
    labels: PromptLabels,
    origin: Option<PaneId>,
}

impl Session {
    pub fn new(
        options: &SessionOptions,
        range: RangeSpec,
        substitute_open: bool,
        default_mask: impl Into<String>,
        extra_args: Vec<String>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            modes: ModeState::for_session(options.initial_modes, substitute_open),
            range,
            extra_args,
            pattern: None,
            replacement: None,
            default_mask: default_mask.into(),
            preview: options.preview,
            labels: options.labels.clone(),
            origin: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn modes(&self) -> &ModeState {
        &self.modes
    }

    pub fn origin(&self) -> Option<PaneId> {
        self.origin
    }

    /// Pane to return focus to once the prompt closes.
    pub fn set_origin(&mut self, pane: PaneId) {
        self.origin = Some(pane);
    }

    /// `Idle -> AwaitPattern`.
    pub fn start(&mut self) -> Step {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::AwaitPattern;
                debug!(target: "session", modes = ?self.modes.open_set(), "session_started");
                Step::Continue(self.state)
            }
            state if state.is_finished() => Step::Abort(FarError::SessionFinished),
            state => Step::Continue(state),
        }
    }

    pub fn prompt(&self) -> Option<Prompt> {
        let (label, default) = match self.state {
            SessionState::AwaitPattern => (&self.labels.pattern, String::new()),
            SessionState::AwaitReplacement => (&self.labels.replace, String::new()),
            SessionState::AwaitFileMask => (&self.labels.file_mask, self.default_mask.clone()),
            _ => return None,
        };
        Some(Prompt {
            state: self.state,
            label: label.clone(),
            default,
            modes: self.modes,
        })
    }

    pub fn step(&mut self, input: PromptInput) -> Step {
        if self.state == SessionState::Idle {
            return Step::Abort(FarError::NotStarted);
        }
        if self.state.is_finished() {
            return Step::Abort(FarError::SessionFinished);
        }
        let text = match input {
            PromptInput::Toggle(mode) => {
                self.modes.toggle(mode);
                return Step::Continue(self.state);
            }
            PromptInput::Cancel => String::new(),
            PromptInput::Submit(text) => text,
        };
        match self.state {
            SessionState::AwaitPattern => self.submit_pattern(text),
            SessionState::AwaitReplacement => self.submit_replacement(text),
            SessionState::AwaitFileMask => self.submit_file_mask(text),
            _ => unreachable!("finished and idle states handled above"),
        }
    }

    fn submit_pattern(&mut self, text: String) -> Step {
        if text.is_empty() {
            return self.abort(FarError::EmptyPattern);
        }
        self.pattern = Some(text);
        self.modes.set_fixed(Mode::Substitute, true);
        self.state = if self.modes.is_open(Mode::Substitute) {
            SessionState::AwaitReplacement
        } else {
            self.extra_args.push(crate::NO_PREVIEW.to_string());
            SessionState::AwaitFileMask
        };
        Step::Continue(self.state)
    }

    fn submit_replacement(&mut self, text: String) -> Step {
        if text.is_empty() {
            return self.abort(FarError::EmptyReplacement);
        }
        self.replacement = Some(text);
        self.state = SessionState::AwaitFileMask;
        Step::Continue(self.state)
    }

    fn submit_file_mask(&mut self, mask: String) -> Step {
        if mask.is_empty() {
            return self.abort(FarError::EmptyFileMask);
        }
        let raw_pattern = self.pattern.take().unwrap_or_default();
        let pattern = normalize_pattern(&raw_pattern, &self.modes);
        let replace_with = match self.replacement.take() {
            Some(raw) if self.modes.is_open(Mode::Substitute) => {
                normalize_replacement(&raw, &self.modes)
            }
            _ => pattern.clone(),
        };
        let mut request = FarRequest {
            pattern,
            replace_with,
            file_mask: mask,
            range: self.range,
            extra_args: std::mem::take(&mut self.extra_args),
        };
        if !self.preview {
            request.disable_preview();
        }
        self.state = SessionState::Dispatched;
        Step::Dispatch(request)
    }

    fn abort(&mut self, reason: FarError) -> Step {
        info!(target: "session", state = ?self.state, reason = %reason, "session_aborted");
        self.state = SessionState::Aborted;
        Step::Abort(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NO_PREVIEW;
    use core_state::ModeSet;

    fn started(substitute_open: bool) -> Session {
        let mut s = Session::new(
            &SessionOptions::default(),
            RangeSpec::Unscoped,
            substitute_open,
            "**/*.*",
            Vec::new(),
        );
        assert_eq!(s.start(), Step::Continue(SessionState::AwaitPattern));
        s
    }

    fn submit(s: &mut Session, text: &str) -> Step {
        s.step(PromptInput::Submit(text.to_string()))
    }

    #[test]
    fn step_before_start_is_rejected() {
        let mut s = Session::new(
            &SessionOptions::default(),
            RangeSpec::Unscoped,
            false,
            "*",
            Vec::new(),
        );
        assert_eq!(submit(&mut s, "x"), Step::Abort(FarError::NotStarted));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn find_only_skips_replacement() {
        let mut s = started(false);
        assert_eq!(submit(&mut s, "foo"), Step::Continue(SessionState::AwaitFileMask));
        assert!(s.modes().is_fixed(Mode::Substitute));
        match submit(&mut s, "*.rs") {
            Step::Dispatch(req) => {
                assert_eq!(req.pattern, r"\V\cfoo");
                assert_eq!(req.replace_with, req.pattern);
                assert_eq!(req.file_mask, "*.rs");
                assert_eq!(req.extra_args, vec![NO_PREVIEW.to_string()]);
            }
            other => panic!("expected dispatch, got {:?}", other),
        }
        assert_eq!(s.state(), SessionState::Dispatched);
    }

    #[test]
    fn substitute_flow_visits_replacement() {
        let mut s = started(true);
        assert_eq!(submit(&mut s, "a"), Step::Continue(SessionState::AwaitReplacement));
        assert_eq!(submit(&mut s, r"b\1"), Step::Continue(SessionState::AwaitFileMask));
        let Step::Dispatch(req) = submit(&mut s, "src/") else {
            panic!("expected dispatch");
        };
        assert_eq!(req.pattern, r"\V\ca");
        assert_eq!(req.replace_with, r"b\\1");
        assert!(req.extra_args.is_empty());
    }

    #[test]
    fn finished_session_cannot_restart() {
        let mut s = started(true);
        submit(&mut s, "a&b");
        submit(&mut s, "x&y~");
        let Step::Dispatch(req) = submit(&mut s, "*") else {
            panic!("expected dispatch");
        };
        assert_eq!(req.replace_with, r"x\&y\~");
        assert_eq!(s.start(), Step::Abort(FarError::SessionFinished));
        assert_eq!(s.state(), SessionState::Dispatched);
        assert_eq!(s.step(PromptInput::Cancel), Step::Abort(FarError::SessionFinished));
    }

    #[test]
    fn empty_pattern_aborts_without_fixing_substitute() {
        let mut s = started(true);
        assert_eq!(s.step(PromptInput::Toggle(Mode::Word)), Step::Continue(SessionState::AwaitPattern));
        assert_eq!(submit(&mut s, ""), Step::Abort(FarError::EmptyPattern));
        assert_eq!(s.state(), SessionState::Aborted);
        assert!(!s.modes().is_fixed(Mode::Substitute));
        assert!(s.modes().is_open(Mode::Word), "toggles are not rolled back");
        assert_eq!(submit(&mut s, "late"), Step::Abort(FarError::SessionFinished));
    }

    #[test]
    fn cancel_counts_as_empty_input() {
        let mut s = started(true);
        submit(&mut s, "a");
        assert_eq!(s.step(PromptInput::Cancel), Step::Abort(FarError::EmptyReplacement));

        let mut s = started(false);
        submit(&mut s, "a");
        assert_eq!(s.step(PromptInput::Cancel), Step::Abort(FarError::EmptyFileMask));
    }

    #[test]
    fn substitute_toggle_only_during_pattern_step() {
        let mut s = started(false);
        s.step(PromptInput::Toggle(Mode::Substitute));
        assert_eq!(submit(&mut s, "a"), Step::Continue(SessionState::AwaitReplacement));
        s.step(PromptInput::Toggle(Mode::Substitute));
        assert!(s.modes().is_open(Mode::Substitute), "fixed after pattern step");
    }

    #[test]
    fn later_toggles_apply_at_dispatch() {
        let mut s = started(false);
        submit(&mut s, "a.b");
        s.step(PromptInput::Toggle(Mode::CaseSensitive));
        s.step(PromptInput::Toggle(Mode::Word));
        let Step::Dispatch(req) = submit(&mut s, "*") else {
            panic!("expected dispatch");
        };
        assert_eq!(req.pattern, r"\V\<\Ca.b\>");
    }

    #[test]
    fn prompt_reflects_step_and_default_mask() {
        let mut s = started(false);
        let p = s.prompt().unwrap();
        assert_eq!(p.label, "Search (pattern): ");
        assert!(p.default.is_empty());
        submit(&mut s, "x");
        let p = s.prompt().unwrap();
        assert_eq!(p.state, SessionState::AwaitFileMask);
        assert_eq!(p.default, "**/*.*");
        submit(&mut s, "*");
        assert!(s.prompt().is_none());
    }

    #[test]
    fn configured_modes_seed_session_and_preview_off() {
        let options = SessionOptions {
            initial_modes: ModeSet::REGEX | ModeSet::SUBSTITUTE,
            preview: false,
            ..SessionOptions::default()
        };
        let mut s = Session::new(&options, RangeSpec::Unscoped, true, "*", vec!["--x".into()]);
        assert!(s.modes().is_open(Mode::Regex));
        s.start();
        submit(&mut s, r"\d+");
        submit(&mut s, r"<\0>");
        let Step::Dispatch(req) = submit(&mut s, "*") else {
            panic!("expected dispatch");
        };
        assert_eq!(req.pattern, r"\c\d+");
        assert_eq!(req.replace_with, r"<\0>");
        assert_eq!(req.extra_args, vec!["--x".to_string(), NO_PREVIEW.to_string()]);
    }
}
