//! The report command: resolve inputs, build the timeline, write it out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use td_core::{RunRequest, TimeRange, build_timeline};

use crate::render::{self, Format};
use crate::{Cli, Config};

/// Where a rendered report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// Merges command-line values over the configuration into one request.
///
/// Explicit lists replace configured ones; flags can only switch features
/// on (`--discover`) or off (`--no-working`).
pub fn build_request(cli: &Cli, config: &Config, range: &TimeRange, cwd: &Path) -> RunRequest {
    let pick = |explicit: &[PathBuf], configured: &[PathBuf]| {
        if explicit.is_empty() {
            configured.to_vec()
        } else {
            explicit.to_vec()
        }
    };

    let discover = cli.discover || config.discover;
    let mut discover_roots = pick(&cli.roots, &config.discover_roots);
    if discover && discover_roots.is_empty() {
        discover_roots.push(cwd.to_path_buf());
    }

    RunRequest {
        git_paths: pick(&cli.git, &config.git_paths),
        svn_paths: pick(&cli.svn, &config.svn_paths),
        notes_file: notes_file(cli, config, range),
        manual: cli.add.clone(),
        include_working: config.include_working && !cli.no_working,
        skip_vcs: cli.no_vcs,
        discover,
        discover_roots,
    }
}

/// `--notes`, then `notes_file`, then `<notes_dir>/<date>.txt` if it exists.
fn notes_file(cli: &Cli, config: &Config, range: &TimeRange) -> Option<PathBuf> {
    if let Some(path) = cli.notes.as_ref().or(config.notes_file.as_ref()) {
        return Some(path.clone());
    }
    let candidate = config
        .notes_dir
        .as_ref()?
        .join(format!("{}.txt", range.label()));
    candidate.is_file().then_some(candidate)
}

/// Resolves where the report is written.
pub fn destination(cli: &Cli, config: &Config, format: Format, range: &TimeRange) -> Destination {
    if cli.stdout {
        return Destination::Stdout;
    }
    let path = cli.output.clone().unwrap_or_else(|| {
        config
            .output_dir
            .join(format!("{}.{}", range.label(), format.extension()))
    });
    Destination::File(path)
}

fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Runs the report command.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let range = TimeRange::resolve(cli.date.as_deref())?;
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let request = build_request(cli, config, &range, &cwd);
    tracing::debug!(?request, date = %range.label(), "resolved request");

    let runner = config.runner();
    let timeline = build_timeline(&request, range, &runner);

    let format = cli.format.unwrap_or(config.format);
    let output = render::render(format, &timeline, Local::now().naive_local())
        .context("failed to render report")?;

    match destination(cli, config, format, &range) {
        Destination::Stdout => print!("{output}"),
        Destination::File(path) => {
            write_report(&path, &output)?;
            println!("saved report: {}", path.display());
        }
    }

    Ok(())
}
