//! Day boundaries for a report.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Date format accepted on input and used for report labels.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the range boundaries passed to VCS date filters.
const BOUNDARY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors resolving the report date.
#[derive(Debug, Error)]
pub enum RangeError {
    /// The date argument was present but not `YYYY-MM-DD`.
    #[error("invalid date {input:?}, expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A closed local interval `[start, end]` covering one calendar day.
///
/// `end` is the last second of the day (23:59:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    /// The range covering `date` from midnight to 23:59:59.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        let end = start + Duration::days(1) - Duration::seconds(1);
        Self { start, end }
    }

    /// Resolves an optional `YYYY-MM-DD` string, defaulting to today.
    pub fn resolve(date: Option<&str>) -> Result<Self, RangeError> {
        Self::resolve_at(date, Local::now().date_naive())
    }

    /// Like [`TimeRange::resolve`] with an explicit notion of "today".
    pub fn resolve_at(date: Option<&str>, today: NaiveDate) -> Result<Self, RangeError> {
        let day = match date {
            Some(input) => NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(
                |source| RangeError::InvalidDate {
                    input: input.to_string(),
                    source,
                },
            )?,
            None => today,
        };
        Ok(Self::for_date(day))
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// The calendar day this range covers.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains(&self, when: NaiveDateTime) -> bool {
        self.start <= when && when <= self.end
    }

    /// `YYYY-MM-DD` label of the covered day.
    #[must_use]
    pub fn label(&self) -> String {
        self.date().format(DATE_FORMAT).to_string()
    }

    pub(crate) fn start_arg(&self) -> String {
        self.start.format(BOUNDARY_FORMAT).to_string()
    }

    pub(crate) fn end_arg(&self) -> String {
        self.end.format(BOUNDARY_FORMAT).to_string()
    }
}
