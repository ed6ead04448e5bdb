//! Settings that survive across sessions.
//!
//! Only the default file mask qualifies. It is read when a command omits the
//! mask and overwritten whenever the user types one interactively.

use tracing::debug;

/// Mask used when neither configuration nor the user supplied one.
pub const DEFAULT_FILE_MASK: &str = "**/*.*";

pub trait SettingsStore {
    fn default_file_mask(&self) -> String;
    fn set_default_file_mask(&mut self, mask: &str);
}

/// Process-local store; the host owns one and injects it into every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySettings {
    default_file_mask: String,
}

impl MemorySettings {
    pub fn new(default_file_mask: impl Into<String>) -> Self {
        Self {
            default_file_mask: default_file_mask.into(),
        }
    }
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_MASK)
    }
}

impl SettingsStore for MemorySettings {
    fn default_file_mask(&self) -> String {
        self.default_file_mask.clone()
    }

    fn set_default_file_mask(&mut self, mask: &str) {
        if self.default_file_mask != mask {
            debug!(
                target: "state.settings",
                old = self.default_file_mask.as_str(),
                new = mask,
                "default_file_mask_updated"
            );
            self.default_file_mask = mask.to_string();
        }
    }
}
