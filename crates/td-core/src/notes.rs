//! Free-form notes and manual entries.
//!
//! Both use the same `HH:MM text` rule. Lines without a usable time are
//! kept whole and placed at 09:00 on the report date.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::entry::{Entry, Source};
use crate::outcome::{EmptyReason, Outcome};

/// 1-2 digit hour, 2 digit minute, whitespace, then the text.
static TIME_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})\s+(.+)$").unwrap());

/// Time given to lines without a leading `HH:MM`.
pub const DEFAULT_TIME: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => panic!("09:00 is a valid time"),
};

/// Parses one `HH:MM text` item for `date`. Blank input yields `None`.
///
/// An out-of-range time such as `25:00` counts as no time at all.
pub fn parse_time_text(text: &str, date: NaiveDate, source: Source) -> Option<Entry> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (when, summary) = leading_time(text, date)
        .unwrap_or_else(|| (date.and_time(DEFAULT_TIME), text));
    Some(Entry::new(when, source, summary))
}

fn leading_time(text: &str, date: NaiveDate) -> Option<(NaiveDateTime, &str)> {
    let caps = TIME_TEXT_RE.captures(text)?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    let when = date.and_hms_opt(hour, minute, 0)?;
    Some((when, caps.get(3)?.as_str()))
}

/// Entries for items supplied directly by the user.
pub fn manual_entries<S: AsRef<str>>(items: &[S], date: NaiveDate) -> Vec<Entry> {
    items
        .iter()
        .filter_map(|item| parse_time_text(item.as_ref(), date, Source::Manual))
        .collect()
}

/// Entries for each non-blank line of a notes text.
pub fn parse_notes_text(content: &str, date: NaiveDate) -> Vec<Entry> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .filter_map(|line| parse_time_text(line, date, Source::Note))
        .collect()
}

/// Reads a notes file. A missing file is not an error.
pub fn parse_notes(path: &Path, date: NaiveDate) -> Outcome {
    match fs::read_to_string(path) {
        Ok(content) => Outcome::from_entries(parse_notes_text(&content, date)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "notes file not found");
            Outcome::Empty(EmptyReason::MissingFile)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read notes file");
            Outcome::Empty(EmptyReason::Unreadable)
        }
    }
}
