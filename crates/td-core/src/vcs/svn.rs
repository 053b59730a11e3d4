//! svn history and working-copy collection.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::entry::{Entry, Source};
use crate::outcome::{EmptyReason, Outcome};
use crate::process::CommandRunner;
use crate::range::TimeRange;
use crate::timestamp;
use crate::vcs::{PendingChange, VcsKind, pending_entries};

const PROGRAM: &str = "svn";

/// Column where the path starts in `svn status` output.
const STATUS_PATH_COLUMN: usize = 8;

static DATE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<date>(.*?)</date>").unwrap());
static MSG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<msg>(.*?)</msg>").unwrap());

/// Confirms `repo` is an svn working copy.
///
/// A `.svn` directory is enough; otherwise `svn info` decides, which also
/// covers subdirectories of a working copy.
fn probe(runner: &dyn CommandRunner, repo: &Path) -> Result<(), EmptyReason> {
    if VcsKind::Svn.has_marker(repo) {
        return Ok(());
    }
    let output = runner.run(PROGRAM, &["info", "--non-interactive"], repo);
    if output.success() {
        return Ok(());
    }
    match EmptyReason::from_failure(&output) {
        EmptyReason::CommandFailed { .. } => Err(EmptyReason::NotARepository),
        other => Err(other),
    }
}

/// Revisions of `repo` committed inside `range`.
pub fn collect_log(runner: &dyn CommandRunner, repo: &Path, range: &TimeRange) -> Outcome {
    if let Err(reason) = probe(runner, repo) {
        return Outcome::Empty(reason);
    }

    let revisions = format!("-r{{{}}}:{{{}}}", range.start_arg(), range.end_arg());
    let output = runner.run(
        PROGRAM,
        &["log", "--xml", "--non-interactive", &revisions],
        repo,
    );
    if !output.success() {
        return Outcome::Empty(EmptyReason::from_failure(&output));
    }
    if output.stdout.trim().is_empty() {
        return Outcome::Empty(EmptyReason::NoRecords);
    }

    Outcome::from_entries(parse_log(&output.stdout, &VcsKind::Svn.source(repo), range))
}

/// Parses `svn log --xml` output.
///
/// `<date>` and `<msg>` elements are paired by order of appearance; surplus
/// elements of either kind are ignored. Output that is not well-formed XML is
/// scanned for the same tags instead.
pub fn parse_log(xml: &str, source: &Source, range: &TimeRange) -> Vec<Entry> {
    let pairs = match roxmltree::Document::parse(xml) {
        Ok(doc) => element_pairs(&doc),
        Err(e) => {
            tracing::debug!(error = %e, "svn log is not well-formed XML, scanning tags");
            scanned_pairs(xml)
        }
    };

    pairs
        .into_iter()
        .map(|(date, msg)| {
            let when = timestamp::parse_or(&date, range.start());
            Entry::new(when, source.clone(), msg)
        })
        .collect()
}

fn element_pairs(doc: &roxmltree::Document<'_>) -> Vec<(String, String)> {
    let texts = |tag: &str| -> Vec<String> {
        doc.descendants()
            .filter(|node| node.has_tag_name(tag))
            .map(|node| node.text().unwrap_or_default().to_string())
            .collect()
    };
    texts("date").into_iter().zip(texts("msg")).collect()
}

fn scanned_pairs(xml: &str) -> Vec<(String, String)> {
    let dates = DATE_TAG_RE.captures_iter(xml).map(|c| unescape(&c[1]));
    let msgs = MSG_TAG_RE.captures_iter(xml).map(|c| unescape(&c[1]));
    dates.zip(msgs).collect()
}

/// Decodes the five predefined XML entities.
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Uncommitted changes of `repo` whose files were modified inside `range`.
pub fn collect_working(runner: &dyn CommandRunner, repo: &Path, range: &TimeRange) -> Outcome {
    if let Err(reason) = probe(runner, repo) {
        return Outcome::Empty(reason);
    }

    let output = runner.run(PROGRAM, &["status", "--non-interactive"], repo);
    if !output.success() {
        return Outcome::Empty(EmptyReason::from_failure(&output));
    }

    let changes = parse_status(&output.stdout);
    let source = VcsKind::Svn.source(repo);
    Outcome::from_entries(pending_entries(repo, &changes, range, &source, status_label))
}

/// Parses `svn status` output: a status character, then the path at column 8.
pub fn parse_status(stdout: &str) -> Vec<PendingChange> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let code = line.chars().next()?;
            let path = if line.len() > STATUS_PATH_COLUMN {
                line.get(STATUS_PATH_COLUMN..)
            } else {
                line.get(code.len_utf8()..)
            };
            let Some(path) = path.map(str::trim).filter(|path| !path.is_empty()) else {
                tracing::debug!(line, "skipping malformed status line");
                return None;
            };
            Some(PendingChange {
                code: code.to_string(),
                path: path.to_string(),
            })
        })
        .collect()
}

/// Human label for an svn status character. Unknown codes pass through.
pub fn status_label(code: &str) -> String {
    match code.chars().next().filter(|c| *c != ' ') {
        Some('M') => "modified".to_string(),
        Some('A') => "added".to_string(),
        Some('D') => "deleted".to_string(),
        Some('R') => "replaced".to_string(),
        Some('C') => "conflict".to_string(),
        Some('!') => "missing".to_string(),
        Some('?') => "untracked".to_string(),
        Some(other) => other.to_string(),
        None => "changed".to_string(),
    }
}
