//! Line range scoping for far commands.
//!
//! The host hands every command a `(count, line1, line2)` triple. A count of
//! `NO_RANGE` means the command ran without a range prefix; anything else is
//! taken as an explicit inclusive line range. Line numbers are `u32`, so
//! every explicit bound fits the signed wire form without colliding with the
//! `-1` sentinel. No other validation happens here: inverted or
//! out-of-document ranges are the search engine's concern.

use serde::Serialize;

/// Count value the host uses when no range prefix was typed.
pub const NO_RANGE: i64 = -1;

/// Raw range arguments as delivered by the host command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeArgs {
    pub count: i64,
    pub line1: u32,
    pub line2: u32,
}

impl RangeArgs {
    /// No range prefix. Line numbers are irrelevant and left at 1.
    pub const NONE: RangeArgs = RangeArgs {
        count: NO_RANGE,
        line1: 1,
        line2: 1,
    };

    pub const fn new(count: i64, line1: u32, line2: u32) -> Self {
        Self {
            count,
            line1,
            line2,
        }
    }

    /// Explicit `line1,line2` range.
    pub const fn lines(line1: u32, line2: u32) -> Self {
        Self::new(2, line1, line2)
    }

    pub fn resolve(&self) -> RangeSpec {
        RangeSpec::resolve(self.count, self.line1, self.line2)
    }
}

impl Default for RangeArgs {
    fn default() -> Self {
        Self::NONE
    }
}

/// Resolved scope of a request: the whole document, or an inclusive line range.
///
/// Serializes as a `[start, end]` pair with `[-1, -1]` for `Unscoped`, the
/// shape search engines expect on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "[i64; 2]")]
pub enum RangeSpec {
    Unscoped,
    Inclusive { start: u32, end: u32 },
}

impl RangeSpec {
    pub fn resolve(count: i64, line1: u32, line2: u32) -> Self {
        if count == NO_RANGE {
            RangeSpec::Unscoped
        } else {
            RangeSpec::Inclusive {
                start: line1,
                end: line2,
            }
        }
    }

    /// `(-1, -1)` sentinel for `Unscoped`, the inclusive bounds otherwise.
    pub fn bounds(&self) -> (i64, i64) {
        match *self {
            RangeSpec::Unscoped => (-1, -1),
            RangeSpec::Inclusive { start, end } => (i64::from(start), i64::from(end)),
        }
    }
}

impl From<RangeSpec> for [i64; 2] {
    fn from(range: RangeSpec) -> Self {
        let (start, end) = range.bounds();
        [start, end]
    }
}
