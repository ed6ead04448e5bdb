//! Line-oriented host for the far commands.
//!
//! Stdin carries host command lines (`F foo *.rs`, `3,9Farr`, ...). While an
//! interactive session is open each line is one prompt input instead:
//! `:regex`, `:case`, `:word` and `:substitute` toggle a mode, `:cancel`
//! cancels, an empty line accepts the pre-filled default and anything else
//! is submitted. A leading `\:` submits the rest verbatim with one colon, so
//! `\:regex` searches for `:regex`. End of input cancels the open session.
//!
//! The tab is simulated in memory: pane 0 is the user's buffer and every
//! dispatched find opens a `FAR <n>` pane. Engines echo what they were
//! asked to do as one JSON object per stdout line.

use anyhow::Result;
use core_args::{CommandParser, ParsedCommand, RangeSpec};
use core_config::Config;
use core_mask::{IgnoreRules, MaskRules, rg_ignore_glob_args};
use core_session::commands::{self, CommandOutcome, Progress};
use core_session::{
    Collaborators, EditorHost, FarRequest, Prompt, PromptInput, ReplaceEngine, SearchEngine,
    Session, SessionOptions, UndoLog,
};
use core_state::{MemorySettings, Mode};
use core_view::{Pane, PaneId, ResultsView, ResultsViewHandle, TabHost};
use serde_json::json;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

type Shared<T> = Rc<RefCell<T>>;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next line without its terminator; `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    pub fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}") {
            warn!(target: "runtime", error = %e, "output_write_failed");
        }
    }
}

/// Panes of the single simulated tab.
#[derive(Debug)]
pub struct Tab {
    panes: Vec<Pane>,
    current: PaneId,
    next_pane: u32,
    next_results: u32,
}

impl Default for Tab {
    fn default() -> Self {
        Self {
            panes: vec![Pane::new(PaneId(0), "[origin]")],
            current: PaneId(0),
            next_pane: 1,
            next_results: 1,
        }
    }
}

impl Tab {
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn current(&self) -> PaneId {
        self.current
    }

    /// Open and focus a new results pane.
    fn open_results(&mut self) -> ResultsViewHandle {
        let handle = ResultsViewHandle::new(self.next_results);
        self.next_results += 1;
        let id = PaneId(self.next_pane);
        self.next_pane += 1;
        self.panes.push(Pane::new(id, handle.title()));
        self.current = id;
        handle
    }
}

pub struct HarnessHost<R, W> {
    tab: Shared<Tab>,
    console: Shared<Console<R, W>>,
}

impl<R: BufRead, W: Write> TabHost for HarnessHost<R, W> {
    fn panes(&self) -> Vec<Pane> {
        self.tab.borrow().panes.clone()
    }

    fn current_pane(&self) -> PaneId {
        self.tab.borrow().current
    }

    fn focus(&mut self, pane: PaneId) {
        let mut tab = self.tab.borrow_mut();
        if tab.panes.iter().any(|p| p.id == pane) {
            tab.current = pane;
        } else {
            warn!(target: "runtime", %pane, "focus_target_missing");
        }
    }
}

impl<R: BufRead, W: Write> ResultsView for HarnessHost<R, W> {
    fn close(&mut self, pane: PaneId) {
        let mut tab = self.tab.borrow_mut();
        tab.panes.retain(|p| p.id != pane);
        if tab.current == pane {
            tab.current = tab.panes.first().map(|p| p.id).unwrap_or_default();
        }
        trace!(target: "runtime", %pane, "pane_closed");
    }
}

impl<R: BufRead, W: Write> EditorHost for HarnessHost<R, W> {
    fn echo_error(&mut self, message: &str) {
        self.console.borrow_mut().emit(&format!("error: {message}"));
    }

    /// Empty line accepts `default`; `:cancel` and end of input yield "".
    fn input(&mut self, label: &str, default: &str) -> String {
        let mut console = self.console.borrow_mut();
        console.emit(&prompt_line(label, default));
        match console.read_line() {
            Ok(Some(line)) => {
                if let Some(text) = escaped_text(&line) {
                    text.to_string()
                } else if line.trim() == ":cancel" {
                    String::new()
                } else if line.is_empty() {
                    default.to_string()
                } else {
                    line
                }
            }
            Ok(None) => String::new(),
            Err(e) => {
                warn!(target: "runtime", error = %e, "input_read_failed");
                String::new()
            }
        }
    }

    fn show_prompt(&mut self, prompt: &Prompt) {
        let badges: Vec<&str> = Mode::ALL
            .iter()
            .filter(|m| prompt.modes.is_open(**m))
            .map(|m| m.name())
            .collect();
        let line = format!(
            "[{}] {}",
            badges.join(" "),
            prompt_line(&prompt.label, &prompt.default)
        );
        self.console.borrow_mut().emit(&line);
    }
}

fn prompt_line(label: &str, default: &str) -> String {
    if default.is_empty() {
        label.to_string()
    } else {
        format!("{label}({default})")
    }
}

/// Prints each request and opens a results pane for it.
pub struct EchoSearch<R, W> {
    tab: Shared<Tab>,
    console: Shared<Console<R, W>>,
    root: String,
    ignore_globs: Vec<String>,
}

impl<R: BufRead, W: Write> SearchEngine for EchoSearch<R, W> {
    fn find(&mut self, request: FarRequest) {
        let rules = MaskRules::from_mask(&request.file_mask);
        debug!(
            target: "mask",
            raw = ?rules.raw(),
            normalized = ?rules.normalized(),
            "mask_rules"
        );
        let mut globs = rules.rg_args();
        globs.extend(self.ignore_globs.iter().cloned());
        let view = self.tab.borrow_mut().open_results();
        let line = json!({
            "event": "find",
            "view": view.title(),
            "root": self.root,
            "request": request,
            "globs": globs,
        });
        self.console.borrow_mut().emit(&line.to_string());
    }

    fn refar(&mut self, range: RangeSpec, args: Vec<String>) {
        let line = json!({ "event": "refar", "range": range, "args": args });
        self.console.borrow_mut().emit(&line.to_string());
    }
}

pub struct EchoReplace<R, W> {
    console: Shared<Console<R, W>>,
}

impl<R: BufRead, W: Write> ReplaceEngine for EchoReplace<R, W> {
    fn replace(&mut self, range: RangeSpec, args: Vec<String>) {
        let line = json!({ "event": "replace", "range": range, "args": args });
        self.console.borrow_mut().emit(&line.to_string());
    }
}

pub struct EchoUndo<R, W> {
    console: Shared<Console<R, W>>,
}

impl<R: BufRead, W: Write> UndoLog for EchoUndo<R, W> {
    fn undo(&mut self, range: RangeSpec, args: Vec<String>) {
        let line = json!({ "event": "undo", "range": range, "args": args });
        self.console.borrow_mut().emit(&line.to_string());
    }
}

/// `\:word` stands for the literal text `:word`.
fn escaped_text(line: &str) -> Option<&str> {
    line.strip_prefix('\\').filter(|rest| rest.starts_with(':'))
}

/// Map one stdin line to a prompt input. An empty line accepts `default`.
pub fn prompt_input(line: &str, default: &str) -> PromptInput {
    if let Some(text) = escaped_text(line) {
        return PromptInput::Submit(text.to_string());
    }
    let trimmed = line.trim();
    if trimmed == ":cancel" {
        return PromptInput::Cancel;
    }
    if trimmed.is_empty() {
        return PromptInput::Submit(default.to_string());
    }
    match trimmed.strip_prefix(':').and_then(Mode::from_name) {
        Some(mode) => PromptInput::Toggle(mode),
        None => PromptInput::Submit(line.to_string()),
    }
}

pub struct App<R, W> {
    console: Shared<Console<R, W>>,
    tab: Shared<Tab>,
    host: HarnessHost<R, W>,
    search: EchoSearch<R, W>,
    replace: EchoReplace<R, W>,
    undo: EchoUndo<R, W>,
    settings: MemorySettings,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(config: &Config, input: R, output: W) -> Self {
        let console = Rc::new(RefCell::new(Console::new(input, output)));
        let tab = Rc::new(RefCell::new(Tab::default()));
        let ignore_files = config.file.search.ignore_file_paths();
        match IgnoreRules::load(&ignore_files) {
            Ok(rules) => {
                let (ignore, exceptions) = rules.normalized();
                debug!(target: "mask", ?ignore, ?exceptions, "ignore_rules_loaded");
            }
            Err(e) => warn!(target: "mask", error = %e, "ignore_rules_unreadable"),
        }
        let ignore_globs = rg_ignore_glob_args(&ignore_files).unwrap_or_else(|e| {
            warn!(target: "mask", error = %e, "ignore_globs_unavailable");
            Vec::new()
        });

        Self {
            host: HarnessHost {
                tab: Rc::clone(&tab),
                console: Rc::clone(&console),
            },
            search: EchoSearch {
                tab: Rc::clone(&tab),
                console: Rc::clone(&console),
                root: config.file.search.root.clone(),
                ignore_globs,
            },
            replace: EchoReplace {
                console: Rc::clone(&console),
            },
            undo: EchoUndo {
                console: Rc::clone(&console),
            },
            settings: MemorySettings::new(config.default_file_mask()),
            options: SessionOptions::from(config),
            console,
            tab,
        }
    }

    fn collab(&mut self) -> Collaborators<'_> {
        Collaborators {
            host: &mut self.host,
            search: &mut self.search,
            replace: &mut self.replace,
            undo: &mut self.undo,
            settings: &mut self.settings,
            options: &self.options,
        }
    }

    fn read_line(&self) -> Result<Option<String>> {
        Ok(self.console.borrow_mut().read_line()?)
    }

    /// Execute command lines until end of input.
    pub fn run(&mut self) -> Result<()> {
        while let Some(line) = self.read_line()? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.execute(line)?;
        }
        let tab = self.tab.borrow();
        info!(
            target: "runtime",
            panes = tab.panes().len(),
            current = %tab.current(),
            "input_closed"
        );
        Ok(())
    }

    pub fn execute(&mut self, line: &str) -> Result<()> {
        match CommandParser::parse(line) {
            ParsedCommand::Invocation(invocation) => {
                if let CommandOutcome::Prompting(mut session) =
                    commands::run(&mut self.collab(), &invocation)
                {
                    self.interact(&mut session)?;
                }
            }
            ParsedCommand::Unknown(name) => {
                warn!(target: "runtime", command = name.as_str(), "unknown_command");
                self.host.echo_error(&format!("Not a far command: {name}"));
            }
        }
        Ok(())
    }

    fn interact(&mut self, session: &mut Session) -> Result<Progress> {
        loop {
            let default = session.prompt().map(|p| p.default).unwrap_or_default();
            let input = match self.read_line()? {
                Some(line) => prompt_input(&line, &default),
                None => PromptInput::Cancel,
            };
            let progress = commands::feed(&mut self.collab(), session, input);
            if progress != Progress::Prompting {
                return Ok(progress);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::io::Cursor;

    type TestApp = App<Cursor<Vec<u8>>, Vec<u8>>;

    fn run_script(script: &str) -> TestApp {
        let mut app = App::new(
            &Config::default(),
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        );
        app.run().unwrap();
        app
    }

    fn transcript(app: &TestApp) -> Vec<String> {
        let console = app.console.borrow();
        String::from_utf8(console.output.clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn events(app: &TestApp) -> Vec<Value> {
        transcript(app)
            .iter()
            .filter(|l| l.starts_with('{'))
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn one_shot_find_opens_results_pane() {
        let app = run_script("F foo *.rs\n");
        let events = events(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["event"], "find");
        assert_eq!(events[0]["view"], "FAR 1");
        assert_eq!(events[0]["request"]["pattern"], "foo");
        assert_eq!(events[0]["request"]["range"], json!([-1, -1]));
        assert_eq!(events[0]["globs"], json!(["-g", "*.rs"]));
        let tab = app.tab.borrow();
        assert_eq!(tab.panes().len(), 2);
        assert_eq!(tab.current(), PaneId(1));
    }

    #[test]
    fn interactive_find_with_toggles_and_default_mask() {
        let app = run_script("Farf\n:word\nfoo\n\n");
        let events = events(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["request"]["pattern"], r"\V\<\cfoo\>");
        assert_eq!(events[0]["request"]["file_mask"], "**/*.*");
        assert_eq!(
            events[0]["request"]["extra_args"],
            json!(["--result-preview=0"])
        );
        let lines = transcript(&app);
        assert!(lines.contains(&"[word] Search (pattern): ".to_string()));
        assert!(lines.contains(&"[word] File mask: (**/*.*)".to_string()));
    }

    #[test]
    fn end_of_input_cancels_session() {
        let app = run_script("Farr\nfoo\n");
        assert!(events(&app).is_empty());
        assert_eq!(
            transcript(&app).last().map(String::as_str),
            Some("error: Empty replacement, search cancelled")
        );
    }

    #[test]
    fn new_session_closes_previous_results_pane() {
        let app = run_script("F foo\nFarf\n:cancel\n");
        let tab = app.tab.borrow();
        assert_eq!(tab.panes().len(), 1);
        assert_eq!(tab.current(), PaneId(0));
    }

    #[test]
    fn prompt_command_updates_default_mask() {
        let app = run_script("Farp\nfoo\nbar\n*.md\nF baz\n");
        let events = events(&app);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["request"]["replace_with"], "bar");
        assert_eq!(events[1]["request"]["file_mask"], "*.md");
    }

    #[test]
    fn pass_through_commands_echo_range() {
        let app = run_script("2,4Fardo --x\nFarundo\nRefar\n");
        let events = events(&app);
        assert_eq!(events[0], json!({"event": "replace", "range": [2, 4], "args": ["--x"]}));
        assert_eq!(events[1]["event"], "undo");
        assert_eq!(events[2]["event"], "refar");
    }

    #[test]
    fn unknown_command_reported() {
        let app = run_script("Bogus thing\n");
        assert_eq!(transcript(&app), vec!["error: Not a far command: Bogus thing".to_string()]);
    }

    #[test]
    fn prompt_input_mapping() {
        assert_eq!(prompt_input(":regex", ""), PromptInput::Toggle(Mode::Regex));
        assert_eq!(prompt_input(":case", ""), PromptInput::Toggle(Mode::CaseSensitive));
        assert_eq!(prompt_input(":cancel", "x"), PromptInput::Cancel);
        assert_eq!(prompt_input("", "*.rs"), PromptInput::Submit("*.rs".into()));
        assert_eq!(prompt_input(":other", ""), PromptInput::Submit(":other".into()));
        assert_eq!(prompt_input(" a b", ""), PromptInput::Submit(" a b".into()));
        assert_eq!(prompt_input(r"\:regex", ""), PromptInput::Submit(":regex".into()));
        assert_eq!(prompt_input(r"\:cancel", ""), PromptInput::Submit(":cancel".into()));
        assert_eq!(prompt_input(r"\x", ""), PromptInput::Submit(r"\x".into()));
    }

    #[test]
    fn escaped_colon_searches_for_mode_name() {
        let app = run_script("Farf\n\\:regex\n\n");
        let events = events(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["request"]["pattern"], r"\V\c:regex");
        let lines = transcript(&app);
        assert!(lines.contains(&"[] File mask: (**/*.*)".to_string()));
    }

    #[test]
    fn escaped_colon_reaches_synchronous_prompt() {
        let app = run_script("Farp\n\\:cancel\n\\:word\n*\n");
        let events = events(&app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["request"]["pattern"], ":cancel");
        assert_eq!(events[0]["request"]["replace_with"], ":word");
    }
}
