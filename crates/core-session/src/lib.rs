//! Find-and-replace session orchestration.
//!
//! Turns a far command (one-shot argument list or an interactive prompt
//! sequence) into exactly one fully specified `FarRequest`, or into a single
//! user-visible error with nothing dispatched.
//!
//! Layers:
//! * `request` - the `FarRequest` handed to the search engine.
//! * `collaborators` - traits for everything this crate does not own:
//!   search, replace, undo, the editor host, the settings store.
//! * `session` - the interactive state machine. Pure: it never calls a
//!   collaborator, it only answers `Step`s, so it is testable without a host.
//! * `commands` - the entry points. They wire the state machine and the
//!   argument splitter to the collaborators and report failures on the
//!   host's message line.
//!
//! Everything runs on the host's single UI thread; an entry point runs to
//! completion before returning, except interactive sessions, which the host
//! keeps alive between prompt inputs and feeds through `commands::feed`.

pub mod collaborators;
pub mod commands;
pub mod error;
pub mod request;
pub mod session;

pub use collaborators::{
    Collaborators, EditorHost, PromptLabels, ReplaceEngine, SearchEngine, SessionOptions, UndoLog,
};
pub use commands::{CommandOutcome, Progress};
pub use error::FarError;
pub use request::{FarRequest, NO_PREVIEW};
pub use session::{Prompt, PromptInput, Session, SessionState, Step};
