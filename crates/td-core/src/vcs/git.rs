//! git history and working-tree collection.

use std::path::Path;

use crate::entry::{Entry, Source};
use crate::outcome::{EmptyReason, Outcome};
use crate::process::CommandRunner;
use crate::range::TimeRange;
use crate::timestamp;
use crate::vcs::{PendingChange, VcsKind, pending_entries};

const PROGRAM: &str = "git";

/// Separates log fields; a unit separator cannot occur in a commit subject.
const FIELD_SEPARATOR: char = '\x1f';

/// `hash<US>author-date<US>subject`, one commit per line.
const LOG_FORMAT: &str = "--pretty=%H%x1f%ad%x1f%s";

/// Confirms `repo` is inside a git work tree.
fn probe(runner: &dyn CommandRunner, repo: &Path) -> Result<(), EmptyReason> {
    let output = runner.run(PROGRAM, &["rev-parse", "--is-inside-work-tree"], repo);
    if output.success() && output.stdout.trim() == "true" {
        Ok(())
    } else if output.success() {
        Err(EmptyReason::NotARepository)
    } else {
        match EmptyReason::from_failure(&output) {
            EmptyReason::CommandFailed { .. } => Err(EmptyReason::NotARepository),
            other => Err(other),
        }
    }
}

/// Commits of `repo` inside `range`.
pub fn collect_log(runner: &dyn CommandRunner, repo: &Path, range: &TimeRange) -> Outcome {
    if let Err(reason) = probe(runner, repo) {
        return Outcome::Empty(reason);
    }

    let since = format!("--since={}", range.start_arg());
    let until = format!("--until={}", range.end_arg());
    let output = runner.run(
        PROGRAM,
        &["log", &since, &until, "--date=iso-strict", LOG_FORMAT],
        repo,
    );
    if !output.success() {
        return Outcome::Empty(EmptyReason::from_failure(&output));
    }

    Outcome::from_entries(parse_log(&output.stdout, &VcsKind::Git.source(repo), range))
}

/// Parses `git log` output in [`LOG_FORMAT`].
///
/// Records without exactly three fields are skipped. Unparseable dates fall
/// back to the range start.
pub fn parse_log(stdout: &str, source: &Source, range: &TimeRange) -> Vec<Entry> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            let [_hash, date, subject] = fields.as_slice() else {
                tracing::debug!(fields = fields.len(), "skipping malformed git log record");
                return None;
            };
            let when = timestamp::parse_or(date, range.start());
            Some(Entry::new(when, source.clone(), subject))
        })
        .collect()
}

/// Uncommitted changes of `repo` whose files were modified inside `range`.
pub fn collect_working(runner: &dyn CommandRunner, repo: &Path, range: &TimeRange) -> Outcome {
    if let Err(reason) = probe(runner, repo) {
        return Outcome::Empty(reason);
    }

    let output = runner.run(PROGRAM, &["status", "--porcelain", "-z"], repo);
    if !output.success() {
        return Outcome::Empty(EmptyReason::from_failure(&output));
    }

    let changes = parse_status(&output.stdout);
    let source = VcsKind::Git.source(repo);
    Outcome::from_entries(pending_entries(repo, &changes, range, &source, status_label))
}

/// Parses `git status --porcelain -z` (v1) output.
///
/// Records are NUL-terminated and paths are never quoted. A rename or copy
/// record is followed by the original path, which is skipped so the new path
/// is reported.
pub fn parse_status(stdout: &str) -> Vec<PendingChange> {
    let mut records = stdout.split('\0').filter(|record| !record.is_empty());
    let mut changes = Vec::new();
    while let Some(record) = records.next() {
        let (Some(code), Some(path)) = (record.get(..2), record.get(3..)) else {
            tracing::debug!(record, "skipping malformed status record");
            continue;
        };
        if code.starts_with(['R', 'C']) {
            records.next();
        }
        if path.is_empty() {
            continue;
        }
        changes.push(PendingChange {
            code: code.to_string(),
            path: path.to_string(),
        });
    }
    changes
}

/// Human label for a two-column porcelain status code.
///
/// The worktree column wins unless it is blank. Unknown codes pass through.
pub fn status_label(code: &str) -> String {
    let mut columns = code.chars();
    let index = columns.next().filter(|c| *c != ' ');
    let worktree = columns.next().filter(|c| *c != ' ');

    match worktree.or(index) {
        Some('M') => "modified".to_string(),
        Some('A') => "added".to_string(),
        Some('D') => "deleted".to_string(),
        Some('R') => "renamed".to_string(),
        Some('C') => "copied".to_string(),
        Some('U') => "merge conflict".to_string(),
        Some('?') => "untracked".to_string(),
        Some(other) => other.to_string(),
        None => "changed".to_string(),
    }
}
