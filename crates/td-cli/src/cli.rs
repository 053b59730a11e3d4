//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::render::Format;

/// Builds a report of what you did today.
///
/// Collects git and svn history, uncommitted changes, a notes file and
/// manual items into one time-ordered list.
#[derive(Debug, Parser)]
#[command(name = "td", version, about, long_about = None)]
pub struct Cli {
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    /// git repository paths.
    #[arg(long, num_args = 1..)]
    pub git: Vec<PathBuf>,

    /// svn working copy paths.
    #[arg(long, num_args = 1..)]
    pub svn: Vec<PathBuf>,

    /// Notes file; each line is `HH:MM text`.
    #[arg(long)]
    pub notes: Option<PathBuf>,

    /// Add an item, e.g. `--add "09:10 crash analysis"`. Repeatable.
    #[arg(long = "add", value_name = "TEXT")]
    pub add: Vec<String>,

    /// Where to write the report (e.g. reports/2025-09-20.md).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip git/svn collection.
    #[arg(long)]
    pub no_vcs: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Search the roots for git/svn working copies.
    #[arg(long)]
    pub discover: bool,

    /// Roots searched by --discover. Defaults to the current directory.
    #[arg(long, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Print the report to stdout instead of saving it.
    #[arg(long)]
    pub stdout: bool,

    /// Do not report uncommitted changes.
    #[arg(long)]
    pub no_working: bool,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}
