//! The merged, ordered result of one run.

use crate::entry::Entry;
use crate::range::TimeRange;

/// All entries of one day, ascending by time.
///
/// Entries with equal times keep the order in which they were collected.
/// Nothing is deduplicated: a change seen both in history and in the working
/// tree appears twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    range: TimeRange,
    entries: Vec<Entry>,
}

impl Timeline {
    /// Concatenates `batches` in order and stable-sorts by time.
    pub fn merge<I>(range: TimeRange, batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<Entry>>,
    {
        let mut entries: Vec<Entry> = batches.into_iter().flatten().collect();
        entries.sort_by_key(Entry::when);
        Self { range, entries }
    }

    #[must_use]
    pub const fn range(&self) -> &TimeRange {
        &self.range
    }

    /// `YYYY-MM-DD` label of the report day.
    #[must_use]
    pub fn date_label(&self) -> String {
        self.range.label()
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}
