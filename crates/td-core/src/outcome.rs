//! Explicit results for collectors that are allowed to come back empty.

use std::fmt;

use crate::entry::Entry;
use crate::process::{CommandOutput, EXIT_NOT_FOUND, EXIT_TIMED_OUT};

/// Why a collector produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The path is not a working copy of the expected kind.
    NotARepository,
    /// The VCS executable is not installed.
    ToolUnavailable,
    /// The VCS command was killed at its deadline.
    TimedOut,
    /// The VCS command exited with a non-zero status.
    CommandFailed { code: i32 },
    /// The query succeeded but matched nothing.
    NoRecords,
    /// The input file does not exist.
    MissingFile,
    /// The input file exists but could not be read.
    Unreadable,
}

impl EmptyReason {
    /// Classifies a failed command by its exit code.
    #[must_use]
    pub const fn from_failure(output: &CommandOutput) -> Self {
        match output.code {
            EXIT_NOT_FOUND => Self::ToolUnavailable,
            EXIT_TIMED_OUT => Self::TimedOut,
            code => Self::CommandFailed { code },
        }
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARepository => f.write_str("not a repository"),
            Self::ToolUnavailable => f.write_str("tool unavailable"),
            Self::TimedOut => f.write_str("timed out"),
            Self::CommandFailed { code } => write!(f, "command failed with exit code {code}"),
            Self::NoRecords => f.write_str("no records"),
            Self::MissingFile => f.write_str("file missing"),
            Self::Unreadable => f.write_str("file unreadable"),
        }
    }
}

/// Result of one collection step: data, or a recoverable reason for none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Collected(Vec<Entry>),
    Empty(EmptyReason),
}

impl Outcome {
    /// Wraps entries, turning an empty list into `Empty(NoRecords)`.
    #[must_use]
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        if entries.is_empty() {
            Self::Empty(EmptyReason::NoRecords)
        } else {
            Self::Collected(entries)
        }
    }

    #[must_use]
    pub const fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            Self::Collected(_) => None,
            Self::Empty(reason) => Some(*reason),
        }
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Self::Collected(entries) => entries,
            Self::Empty(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Source;

    #[test]
    fn test_failure_codes_are_classified() {
        assert_eq!(
            EmptyReason::from_failure(&CommandOutput::not_found("svn")),
            EmptyReason::ToolUnavailable
        );
        assert_eq!(
            EmptyReason::from_failure(&CommandOutput::failed(EXIT_TIMED_OUT, "")),
            EmptyReason::TimedOut
        );
        assert_eq!(
            EmptyReason::from_failure(&CommandOutput::failed(128, "fatal")),
            EmptyReason::CommandFailed { code: 128 }
        );
    }

    #[test]
    fn test_no_entries_means_no_records() {
        assert_eq!(
            Outcome::from_entries(Vec::new()).empty_reason(),
            Some(EmptyReason::NoRecords)
        );
    }

    #[test]
    fn test_into_entries_flattens_both_variants() {
        let when = chrono::NaiveDate::from_ymd_opt(2025, 9, 20)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let collected = Outcome::from_entries(vec![Entry::new(when, Source::Note, "x")]);
        assert_eq!(collected.into_entries().len(), 1);
        assert!(Outcome::Empty(EmptyReason::TimedOut).into_entries().is_empty());
    }
}
