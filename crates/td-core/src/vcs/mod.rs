//! Version-control collectors.
//!
//! Each flavor offers two collectors: committed history inside the range,
//! and pending working-tree changes whose files were touched inside the
//! range.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};

use crate::entry::{Entry, Source};
use crate::outcome::Outcome;
use crate::process::CommandRunner;
use crate::range::TimeRange;

pub mod git;
pub mod svn;

/// The supported version-control systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VcsKind {
    Git,
    Svn,
}

impl VcsKind {
    /// Discovery checks markers in this order; the first match claims a directory.
    pub const ALL: [Self; 2] = [Self::Git, Self::Svn];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Svn => "svn",
        }
    }

    /// Name of the metadata entry at the root of a working copy.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Git => ".git",
            Self::Svn => ".svn",
        }
    }

    /// Whether `dir` carries this kind's metadata marker.
    ///
    /// git accepts a `.git` file too, as used by linked worktrees.
    #[must_use]
    pub fn has_marker(self, dir: &Path) -> bool {
        let marker = dir.join(self.marker());
        match self {
            Self::Git => marker.exists(),
            Self::Svn => marker.is_dir(),
        }
    }

    /// Source tag for entries collected from `repo`.
    #[must_use]
    pub fn source(self, repo: &Path) -> Source {
        let name = repo_name(repo);
        match self {
            Self::Git => Source::Git(name),
            Self::Svn => Source::Svn(name),
        }
    }

    /// Committed history of `repo` inside `range`.
    pub fn collect_log(
        self,
        runner: &dyn CommandRunner,
        repo: &Path,
        range: &TimeRange,
    ) -> Outcome {
        match self {
            Self::Git => git::collect_log(runner, repo, range),
            Self::Svn => svn::collect_log(runner, repo, range),
        }
    }

    /// Uncommitted changes of `repo` whose files were modified inside `range`.
    pub fn collect_working(
        self,
        runner: &dyn CommandRunner,
        repo: &Path,
        range: &TimeRange,
    ) -> Outcome {
        match self {
            Self::Git => git::collect_working(runner, repo, range),
            Self::Svn => svn::collect_working(runner, repo, range),
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display name of a repository: the last component of its absolute path.
#[must_use]
pub fn repo_name(repo: &Path) -> String {
    let absolute = std::path::absolute(repo).unwrap_or_else(|_| repo.to_path_buf());
    absolute
        .file_name()
        .map_or_else(|| absolute.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// A file with uncommitted changes, as listed by a status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    /// Status code exactly as the VCS printed it.
    pub code: String,
    /// Path relative to the working copy root.
    pub path: String,
}

/// Turns pending changes into entries timed by file modification time.
///
/// Files that vanished since the listing are timed at the range start.
/// Changes whose time falls outside the range are dropped.
pub(crate) fn pending_entries(
    repo: &Path,
    changes: &[PendingChange],
    range: &TimeRange,
    source: &Source,
    label: fn(&str) -> String,
) -> Vec<Entry> {
    changes
        .iter()
        .filter_map(|change| {
            let when = modified_at(&repo.join(&change.path)).unwrap_or_else(|| range.start());
            if !range.contains(when) {
                tracing::trace!(path = %change.path, %when, "pending change outside range");
                return None;
            }
            let summary = format!("in progress: {} ({})", change.path, label(&change.code));
            Some(Entry::new(when, source.clone(), summary))
        })
        .collect()
}

fn modified_at(path: &Path) -> Option<NaiveDateTime> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified).naive_local())
}
