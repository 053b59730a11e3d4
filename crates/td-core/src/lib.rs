//! Core logic for the daily activity report.
//!
//! This crate turns heterogeneous local records into one timeline:
//! - Collection: git and svn history, uncommitted changes, notes and manual items
//! - Discovery: finding working copies under root directories
//! - Merge: one stable, time-ordered sequence of entries

pub mod discover;
pub mod entry;
pub mod notes;
pub mod outcome;
pub mod paths;
mod pipeline;
pub mod process;
pub mod range;
mod timeline;
pub mod timestamp;
pub mod vcs;

pub use discover::{Discovered, discover_repositories};
pub use entry::{Entry, Source};
pub use outcome::{EmptyReason, Outcome};
pub use paths::flatten_paths;
pub use pipeline::{RunRequest, build_timeline};
pub use process::{CommandOutput, CommandRunner, SystemRunner};
pub use range::{RangeError, TimeRange};
pub use timeline::Timeline;
pub use vcs::VcsKind;
