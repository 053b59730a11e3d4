//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use td_core::SystemRunner;

use crate::render::Format;

/// Config file looked up in the current directory.
const LOCAL_CONFIG_FILE: &str = "td.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// git repositories scanned when `--git` is not given.
    pub git_paths: Vec<PathBuf>,
    /// svn working copies scanned when `--svn` is not given.
    pub svn_paths: Vec<PathBuf>,
    /// Always run repository discovery.
    pub discover: bool,
    /// Discovery roots used when `--roots` is not given.
    pub discover_roots: Vec<PathBuf>,
    /// Notes file used when `--notes` is not given.
    pub notes_file: Option<PathBuf>,
    /// Directory holding one `<date>.txt` notes file per day.
    pub notes_dir: Option<PathBuf>,
    /// Report uncommitted changes.
    pub include_working: bool,
    /// Default output format.
    pub format: Format,
    /// Where reports are saved when `--output` is not given.
    pub output_dir: PathBuf,
    /// Per-command timeout for git/svn; 0 waits forever.
    pub command_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            git_paths: Vec::new(),
            svn_paths: Vec::new(),
            discover: false,
            discover_roots: Vec::new(),
            notes_file: None,
            notes_dir: None,
            include_working: true,
            format: Format::default(),
            output_dir: PathBuf::from("reports"),
            command_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from the working directory
        figment = figment.merge(Toml::file(LOCAL_CONFIG_FILE));

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TD_*)
        figment = figment.merge(Env::prefixed("TD_"));

        figment.extract()
    }

    /// Command runner honoring `command_timeout_secs`.
    #[must_use]
    pub const fn runner(&self) -> SystemRunner {
        if self.command_timeout_secs == 0 {
            SystemRunner::new()
        } else {
            SystemRunner::with_timeout(Duration::from_secs(self.command_timeout_secs))
        }
    }
}

/// Returns the platform-specific config directory for td.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("td"))
}
