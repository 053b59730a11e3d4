//! Timeline entries and their provenance.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Where an entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A git repository, identified by its directory name.
    Git(String),
    /// An svn working copy, identified by its directory name.
    Svn(String),
    /// A line of the notes file.
    Note,
    /// An item supplied directly on the command line.
    Manual,
}

impl Source {
    /// The tag without the repository name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Git(_) => "git",
            Self::Svn(_) => "svn",
            Self::Note => "note",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Git(name) | Self::Svn(name) => write!(f, "{}:{name}", self.kind()),
            Self::Note | Self::Manual => f.write_str(self.kind()),
        }
    }
}

impl Serialize for Source {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One timestamped line of the timeline.
///
/// Entries are immutable once built. The summary is whitespace-normalized on
/// construction, so it never contains newlines or runs of spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    when: NaiveDateTime,
    source: Source,
    summary: String,
}

impl Entry {
    /// Creates an entry, collapsing whitespace in the summary.
    pub fn new(when: NaiveDateTime, source: Source, summary: impl AsRef<str>) -> Self {
        Self {
            when,
            source,
            summary: collapse_whitespace(summary.as_ref()),
        }
    }

    /// Local, timezone-naive time of the activity.
    #[must_use]
    pub const fn when(&self) -> NaiveDateTime {
        self.when
    }

    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// `HH:MM` display form of [`Entry::when`].
    #[must_use]
    pub fn time_label(&self) -> String {
        self.when.format("%H:%M").to_string()
    }
}

/// Replaces every run of whitespace (newlines included) with a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
