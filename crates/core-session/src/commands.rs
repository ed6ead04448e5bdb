//! Entry points invoked by the host's command layer.
//!
//! | command   | entry                | required args                 |
//! |-----------|----------------------|-------------------------------|
//! | `F`       | `find`               | pattern [mask] [flags...]     |
//! | `Far`     | `replace`            | pattern replace [mask] [...]  |
//! | `Farf`    | `start_interactive`  | - (substitute closed)         |
//! | `Farr`    | `start_interactive`  | - (substitute open)           |
//! | `Farp`    | `prompt`             | - (three blocking questions)  |
//! | `Refar`   | `refar`              | -                             |
//! | `Fardo`   | `fardo`              | -                             |
//! | `Farundo` | `farundo`            | -                             |
//!
//! Failures never propagate to the host: each becomes one line through
//! `EditorHost::echo_error` and a `CommandOutcome::Failed` for the caller.
//! One-shot patterns are passed through untouched; the engine applies its
//! own escaping since no mode toggles exist on that path.

use crate::collaborators::Collaborators;
use crate::error::FarError;
use crate::request::FarRequest;
use crate::session::{PromptInput, Session, Step};
use core_args::{EntryPoint, Invocation, RangeArgs, split_args};
use core_view::ensure_singleton;
use tracing::{debug, info};

#[derive(Debug)]
pub enum CommandOutcome {
    /// Request (or pass-through call) delivered to its engine.
    Dispatched,
    /// Interactive session open; feed it prompt input via `feed`.
    Prompting(Session),
    /// Reported to the user; nothing dispatched.
    Failed(FarError),
}

impl CommandOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, CommandOutcome::Dispatched)
    }
}

/// State of an interactive session after one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Prompting,
    Dispatched,
    Aborted(FarError),
}

/// Route a parsed invocation to its entry point.
pub fn run(c: &mut Collaborators<'_>, invocation: &Invocation) -> CommandOutcome {
    let Invocation { entry, range, args } = invocation;
    debug!(target: "session", command = entry.name(), args = args.as_str(), "command_invoked");
    match entry {
        EntryPoint::Find => find(c, *range, args),
        EntryPoint::Replace => replace(c, *range, args),
        EntryPoint::FindInteractive => start_interactive(c, *range, args, false),
        EntryPoint::ReplaceInteractive => start_interactive(c, *range, args, true),
        EntryPoint::Prompt => prompt(c, *range, args),
        EntryPoint::Refar => refar(c, *range, args),
        EntryPoint::Fardo => fardo(c, *range, args),
        EntryPoint::Farundo => farundo(c, *range, args),
    }
}

/// `F <pattern> [<filemask>] [<param>...]`; the replacement is the pattern.
pub fn find(c: &mut Collaborators<'_>, range: RangeArgs, raw_args: &str) -> CommandOutcome {
    let mut args = split_args(raw_args);
    if args.len() == 1 {
        args.push(c.settings.default_file_mask());
    }
    let mut tokens = args.into_iter();
    let (Some(pattern), Some(file_mask)) = (tokens.next(), tokens.next()) else {
        return fail(c, FarError::find_arguments());
    };
    let request = FarRequest {
        replace_with: pattern.clone(),
        pattern,
        file_mask,
        range: range.resolve(),
        extra_args: tokens.collect(),
    };
    dispatch(c, request)
}

/// `Far <pattern> <replace> [<filemask>] [<param>...]`.
pub fn replace(c: &mut Collaborators<'_>, range: RangeArgs, raw_args: &str) -> CommandOutcome {
    let mut args = split_args(raw_args);
    if args.len() == 2 {
        args.push(c.settings.default_file_mask());
    }
    let mut tokens = args.into_iter();
    let (Some(pattern), Some(replace_with), Some(file_mask)) =
        (tokens.next(), tokens.next(), tokens.next())
    else {
        return fail(c, FarError::replace_arguments());
    };
    let request = FarRequest {
        pattern,
        replace_with,
        file_mask,
        range: range.resolve(),
        extra_args: tokens.collect(),
    };
    dispatch(c, request)
}

/// `Farf` / `Farr`: close any existing results view, then open the pattern
/// prompt. The returned session is driven with `feed`.
pub fn start_interactive(
    c: &mut Collaborators<'_>,
    range: RangeArgs,
    raw_args: &str,
    substitute_open: bool,
) -> CommandOutcome {
    ensure_singleton(&mut *c.host);
    let mut session = Session::new(
        c.options,
        range.resolve(),
        substitute_open,
        c.settings.default_file_mask(),
        split_args(raw_args),
    );
    session.set_origin(c.host.current_pane());
    if let Step::Abort(err) = session.start() {
        return fail(c, err);
    }
    if let Some(p) = session.prompt() {
        c.host.show_prompt(&p);
    }
    CommandOutcome::Prompting(session)
}

/// Apply one prompt input to a live session.
pub fn feed(c: &mut Collaborators<'_>, session: &mut Session, input: PromptInput) -> Progress {
    match session.step(input) {
        Step::Continue(_) => {
            if let Some(p) = session.prompt() {
                c.host.show_prompt(&p);
            }
            Progress::Prompting
        }
        Step::Abort(err) => {
            finish_prompt(c, session);
            fail(c, err.clone());
            Progress::Aborted(err)
        }
        Step::Dispatch(request) => {
            c.settings.set_default_file_mask(&request.file_mask);
            finish_prompt(c, session);
            dispatch(c, request);
            Progress::Dispatched
        }
    }
}

/// Feed inputs until the session finishes or the inputs run out. Running
/// out counts as cancel.
pub fn drive<I>(c: &mut Collaborators<'_>, session: &mut Session, inputs: I) -> Progress
where
    I: IntoIterator<Item = PromptInput>,
{
    for input in inputs {
        let progress = feed(c, session, input);
        if progress != Progress::Prompting {
            return progress;
        }
    }
    feed(c, session, PromptInput::Cancel)
}

/// `Farp` (or bare `Far`): ask pattern, replacement and file mask through
/// blocking host input. Only pattern and mask are required.
pub fn prompt(c: &mut Collaborators<'_>, range: RangeArgs, raw_args: &str) -> CommandOutcome {
    ensure_singleton(&mut *c.host);
    let labels = c.options.labels.clone();
    let pattern = c.host.input(&labels.pattern, "");
    if pattern.is_empty() {
        return fail(c, FarError::NoPattern);
    }
    let replace_with = c.host.input(&labels.replace, "");
    let default_mask = c.settings.default_file_mask();
    let file_mask = c.host.input(&labels.file_mask, &default_mask);
    if file_mask.is_empty() {
        return fail(c, FarError::NoFileMask);
    }
    c.settings.set_default_file_mask(&file_mask);
    let request = FarRequest {
        pattern,
        replace_with,
        file_mask,
        range: range.resolve(),
        extra_args: split_args(raw_args),
    };
    dispatch(c, request)
}

pub fn refar(c: &mut Collaborators<'_>, range: RangeArgs, raw_args: &str) -> CommandOutcome {
    c.search.refar(range.resolve(), split_args(raw_args));
    CommandOutcome::Dispatched
}

pub fn fardo(c: &mut Collaborators<'_>, range: RangeArgs, raw_args: &str) -> CommandOutcome {
    c.replace.replace(range.resolve(), split_args(raw_args));
    CommandOutcome::Dispatched
}

pub fn farundo(c: &mut Collaborators<'_>, range: RangeArgs, raw_args: &str) -> CommandOutcome {
    c.undo.undo(range.resolve(), split_args(raw_args));
    CommandOutcome::Dispatched
}

fn dispatch(c: &mut Collaborators<'_>, mut request: FarRequest) -> CommandOutcome {
    if !c.options.preview {
        request.disable_preview();
    }
    info!(
        target: "session.dispatch",
        pattern = request.pattern.as_str(),
        file_mask = request.file_mask.as_str(),
        range = ?request.range,
        extra_args = request.extra_args.len(),
        "request_dispatched"
    );
    c.search.find(request);
    CommandOutcome::Dispatched
}

fn finish_prompt(c: &mut Collaborators<'_>, session: &Session) {
    c.host.close_prompt();
    if let Some(origin) = session.origin() {
        c.host.focus(origin);
    }
}

fn fail(c: &mut Collaborators<'_>, err: FarError) -> CommandOutcome {
    info!(target: "session", error = %err, "command_failed");
    c.host.echo_error(&err.to_string());
    CommandOutcome::Failed(err)
}
