//! One full run: discovery, collection and merge.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::discover::discover_repositories;
use crate::entry::Entry;
use crate::notes;
use crate::outcome::Outcome;
use crate::paths::flatten_paths;
use crate::process::CommandRunner;
use crate::range::TimeRange;
use crate::timeline::Timeline;
use crate::vcs::VcsKind;

/// Everything a run needs, assembled once before collection starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    /// git working copies to scan.
    pub git_paths: Vec<PathBuf>,
    /// svn working copies to scan.
    pub svn_paths: Vec<PathBuf>,
    /// Notes file for the day, if any.
    pub notes_file: Option<PathBuf>,
    /// `HH:MM text` items supplied by the user.
    pub manual: Vec<String>,
    /// Also report uncommitted changes.
    pub include_working: bool,
    /// Skip all version-control collection.
    pub skip_vcs: bool,
    /// Search `discover_roots` for more working copies.
    pub discover: bool,
    pub discover_roots: Vec<PathBuf>,
}

impl RunRequest {
    /// The flattened repository lists to scan, discovery included.
    #[must_use]
    pub fn repositories(&self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut git = self.git_paths.clone();
        let mut svn = self.svn_paths.clone();
        if self.discover {
            let found = discover_repositories(&self.discover_roots);
            tracing::debug!(
                git = found.git.len(),
                svn = found.svn.len(),
                "discovery finished"
            );
            git.extend(found.git);
            svn.extend(found.svn);
        }
        (flatten_paths(git), flatten_paths(svn))
    }
}

/// Builds the timeline for `range`.
///
/// Never fails: every source that cannot be read contributes nothing.
/// Repositories are collected in parallel, but results are merged in a fixed
/// order, so the output does not depend on scheduling.
pub fn build_timeline(
    request: &RunRequest,
    range: TimeRange,
    runner: &dyn CommandRunner,
) -> Timeline {
    let mut batches: Vec<Vec<Entry>> = Vec::new();

    if let Some(path) = &request.notes_file {
        batches.push(log_outcome("notes", path, notes::parse_notes(path, range.date())));
    }
    batches.push(notes::manual_entries(&request.manual, range.date()));

    if request.skip_vcs {
        tracing::debug!("version-control collection skipped");
    } else {
        let (git, svn) = request.repositories();
        let jobs: Vec<(VcsKind, PathBuf)> = git
            .into_iter()
            .map(|path| (VcsKind::Git, path))
            .chain(svn.into_iter().map(|path| (VcsKind::Svn, path)))
            .collect();

        let collected: Vec<Vec<Entry>> = jobs
            .par_iter()
            .map(|(kind, repo)| {
                collect_repository(*kind, repo, &range, request.include_working, runner)
            })
            .collect();
        batches.extend(collected);
    }

    let timeline = Timeline::merge(range, batches);
    tracing::debug!(entries = timeline.entries().len(), "timeline built");
    timeline
}

fn collect_repository(
    kind: VcsKind,
    repo: &Path,
    range: &TimeRange,
    include_working: bool,
    runner: &dyn CommandRunner,
) -> Vec<Entry> {
    if !repo.is_dir() {
        tracing::debug!(%kind, path = %repo.display(), "skipping missing repository path");
        return Vec::new();
    }

    let mut entries = log_outcome(kind.as_str(), repo, kind.collect_log(runner, repo, range));
    if include_working {
        entries.extend(log_outcome(
            kind.as_str(),
            repo,
            kind.collect_working(runner, repo, range),
        ));
    }
    entries
}

fn log_outcome(what: &str, path: &Path, outcome: Outcome) -> Vec<Entry> {
    match &outcome {
        Outcome::Collected(entries) => {
            tracing::debug!(what, path = %path.display(), count = entries.len(), "collected");
        }
        Outcome::Empty(reason) => {
            tracing::debug!(what, path = %path.display(), %reason, "nothing collected");
        }
    }
    outcome.into_entries()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;

    use super::*;
    use crate::process::CommandOutput;
    use crate::vcs::testing::FakeRunner;

    fn range() -> TimeRange {
        TimeRange::for_date(NaiveDate::from_ymd_opt(2025, 9, 20).unwrap())
    }

    fn git_runner(log: &str) -> FakeRunner {
        FakeRunner::default()
            .respond("git rev-parse", CommandOutput::ok("true\n"))
            .respond("git log", CommandOutput::ok(log))
            .respond("git status", CommandOutput::ok(""))
    }

    fn render(timeline: &Timeline) -> Vec<String> {
        timeline
            .entries()
            .iter()
            .map(|e| format!("{} · {} ({})", e.time_label(), e.summary(), e.source()))
            .collect()
    }

    #[test]
    fn test_commit_and_manual_entry_are_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("shop");
        fs::create_dir(&repo).unwrap();

        let request = RunRequest {
            git_paths: vec![repo],
            manual: vec!["14:00 reviewed PR".into()],
            include_working: true,
            ..RunRequest::default()
        };
        let runner = git_runner("abc\x1f2025-09-20T09:15:00\x1ffix bug\n");

        let timeline = build_timeline(&request, range(), &runner);
        assert_eq!(
            render(&timeline),
            ["09:15 · fix bug (git:shop)", "14:00 · reviewed PR (manual)"]
        );
    }

    #[test]
    fn test_skip_vcs_runs_no_commands() {
        let dir = tempfile::tempdir().unwrap();
        let request = RunRequest {
            git_paths: vec![dir.path().to_path_buf()],
            manual: vec!["note to self".into()],
            skip_vcs: true,
            ..RunRequest::default()
        };
        let runner = git_runner("abc\x1f2025-09-20T09:15:00\x1ffix bug\n");

        let timeline = build_timeline(&request, range(), &runner);
        assert_eq!(render(&timeline), ["09:00 · note to self (manual)"]);
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_working_tree_collection_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let request = RunRequest {
            git_paths: vec![dir.path().to_path_buf()],
            include_working: false,
            ..RunRequest::default()
        };
        let runner = git_runner("");

        build_timeline(&request, range(), &runner);
        assert!(runner.calls_for("git status").is_empty());
        assert_eq!(runner.calls_for("git log").len(), 1);
    }

    #[test]
    fn test_overlapping_paths_are_scanned_once() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("inner");
        fs::create_dir(&inner).unwrap();
        let request = RunRequest {
            git_paths: vec![dir.path().to_path_buf(), inner, dir.path().to_path_buf()],
            ..RunRequest::default()
        };
        let runner = git_runner("abc\x1f2025-09-20T09:15:00\x1ffix bug\n");

        let timeline = build_timeline(&request, range(), &runner);
        assert_eq!(timeline.entries().len(), 1);
        assert_eq!(runner.calls_for("git log").len(), 1);
    }

    #[test]
    fn test_missing_tools_and_paths_still_produce_a_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "08:00 planning\n").unwrap();
        let request = RunRequest {
            git_paths: vec![dir.path().join("does-not-exist")],
            svn_paths: vec![dir.path().to_path_buf()],
            notes_file: Some(notes),
            include_working: true,
            ..RunRequest::default()
        };

        let timeline = build_timeline(&request, range(), &FakeRunner::default());
        assert_eq!(render(&timeline), ["08:00 · planning (note)"]);
    }

    #[test]
    fn test_discovery_adds_repositories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("found/.git")).unwrap();
        let request = RunRequest {
            discover: true,
            discover_roots: vec![dir.path().to_path_buf()],
            ..RunRequest::default()
        };
        let (git, svn) = request.repositories();
        assert_eq!(git.len(), 1);
        assert!(git[0].ends_with("found"));
        assert!(svn.is_empty());
    }

    #[test]
    fn test_rerunning_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let request = RunRequest {
            git_paths: vec![dir.path().to_path_buf()],
            manual: vec!["09:15 same minute".into(), "16:00 later".into()],
            include_working: true,
            ..RunRequest::default()
        };
        let runner = git_runner(
            "a\x1f2025-09-20T09:15:00\x1fone\nb\x1f2025-09-20T12:00:00\x1ftwo\n",
        );
        let first = build_timeline(&request, range(), &runner);
        let second = build_timeline(&request, range(), &runner);
        assert_eq!(first, second);
        assert!(first.entries().windows(2).all(|w| w[0].when() <= w[1].when()));
    }
}
