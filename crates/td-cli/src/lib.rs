//! Daily activity report CLI library.
//!
//! This crate provides the command-line interface around `td-core`:
//! argument parsing, configuration and rendering.

mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::Cli;
pub use config::Config;
pub use render::Format;
