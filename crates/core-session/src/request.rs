use core_args::RangeSpec;
use serde::Serialize;

/// Engine flag that disables the results preview; appended to find-only
/// interactive sessions.
pub const NO_PREVIEW: &str = "--result-preview=0";

/// A complete search request. Built once, handed to the search engine, and
/// not retained afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarRequest {
    pub pattern: String,
    pub replace_with: String,
    pub file_mask: String,
    pub range: RangeSpec,
    pub extra_args: Vec<String>,
}

impl FarRequest {
    pub fn has_arg(&self, arg: &str) -> bool {
        self.extra_args.iter().any(|a| a == arg)
    }

    /// Append the no-preview directive unless it is already present.
    pub(crate) fn disable_preview(&mut self) {
        if !self.has_arg(NO_PREVIEW) {
            self.extra_args.push(NO_PREVIEW.to_string());
        }
    }
}
