//! Argument handling for far commands.
//!
//! Three pure pieces live here, all free of editor state:
//! * `split` - tokenizes a raw command-line argument string (quote aware).
//! * `range` - turns the host's count/line triple into a `RangeSpec`.
//! * `command_parser` - classifies a full host command line (`:10,20Far a b`)
//!   into an entry point plus its range and raw argument tail.
//!
//! Nothing in this crate reports errors to the user; callers decide what an
//! empty or short token list means for their entry point.

pub mod command_parser;
pub mod range;
pub mod split;

pub use command_parser::{CommandParser, EntryPoint, Invocation, ParsedCommand};
pub use range::{NO_RANGE, RangeArgs, RangeSpec};
pub use split::split_args;
