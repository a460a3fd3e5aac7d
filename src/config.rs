use crate::error::{AppError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration management for the application.
///
/// Built once at startup, from defaults, an optional TOML file and the
/// command line, and then passed by reference to the components that need
/// it. Nothing reads configuration from process-wide state.

/// Configuration for a download run.
///
/// # Examples
///
/// ```
/// use music_dl::Config;
///
/// let config = Config::default();
/// assert_eq!(config.backend, "ytdl");
/// assert_eq!(config.format, "mp3");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backend name, see [`crate::downloader::create_downloader`].
    pub backend: String,
    /// Audio format requested from the backend.
    pub format: String,
    pub output_dir: PathBuf,
    /// Print found/started/completed notices on stdout.
    pub print_info: bool,
    /// Number of downloads allowed in flight at once.
    pub jobs: usize,
    /// Overrides the backend's default executable.
    pub executable: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: String::from("ytdl"),
            format: String::from("mp3"),
            output_dir: PathBuf::from("."),
            print_info: false,
            jobs: 1,
            executable: None,
        }
    }
}

impl Config {
    /// Loads a configuration file; keys it omits keep their defaults.
    pub fn load(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(AppError::Config("jobs must be at least 1".into()));
        }
        if self.format.trim().is_empty() {
            return Err(AppError::Config("output format must not be empty".into()));
        }
        Ok(())
    }
}
