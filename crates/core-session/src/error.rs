use thiserror::Error;

pub(crate) const FIND_FORMAT: &str = "<pattern> <filemask> [<param1>...]";
pub(crate) const REPLACE_FORMAT: &str = "<pattern> <replace> <filemask> [<param1>...]";

/// User input errors. The `Display` text is the exact line shown to the
/// user; none of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FarError {
    #[error("Arguments required. Format: {format}")]
    ArgumentsRequired { format: &'static str },
    #[error("Empty pattern, search cancelled")]
    EmptyPattern,
    #[error("Empty replacement, search cancelled")]
    EmptyReplacement,
    #[error("Empty file mask, search cancelled")]
    EmptyFileMask,
    #[error("No pattern")]
    NoPattern,
    #[error("No file mask")]
    NoFileMask,
    #[error("Session has not started")]
    NotStarted,
    #[error("Session already finished")]
    SessionFinished,
}

impl FarError {
    pub(crate) fn find_arguments() -> Self {
        FarError::ArgumentsRequired {
            format: FIND_FORMAT,
        }
    }

    pub(crate) fn replace_arguments() -> Self {
        FarError::ArgumentsRequired {
            format: REPLACE_FORMAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_messages_name_the_format() {
        assert_eq!(
            FarError::find_arguments().to_string(),
            "Arguments required. Format: <pattern> <filemask> [<param1>...]"
        );
        assert_eq!(
            FarError::replace_arguments().to_string(),
            "Arguments required. Format: <pattern> <replace> <filemask> [<param1>...]"
        );
    }
}
