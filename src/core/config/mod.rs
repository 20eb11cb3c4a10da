//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! An explicit `--config <path>` must exist. Otherwise these are searched
//! in order and the first existing file wins:
//! 1. `$GITPLAY_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitplay/config.toml`
//! 3. `~/.gitplay/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use git_playground::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("Speed: {}", config.speed());
//! println!("Author: {}", config.author());
//! ```

pub mod schema;

pub use schema::{FileConfig, OutputConfig, PacingConfig, PlaygroundConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::state::{Template, DEFAULT_SAMPLE_FILES};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GITPLAY_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded configuration with defaulting accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (all defaults if no file was found)
    pub file: FileConfig,
    /// Path to the loaded config file
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// If `explicit` is provided it must exist; otherwise the standard
    /// locations are searched.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::search(&mut warnings),
        };

        let file = match &path {
            Some(path) => Self::read(path)?,
            None => FileConfig::default(),
        };
        file.validate()?;

        Ok(ConfigLoadResult {
            config: Config { file, path },
            warnings,
        })
    }

    /// Find the first existing config file in the standard locations.
    fn search(warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        // 1. Check $GITPLAY_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            warnings.push(ConfigWarning {
                message: format!("{CONFIG_ENV} points to a missing file, ignoring it"),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/gitplay/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitplay/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.gitplay/config.toml
        dirs::home_dir()
            .map(|home| home.join(".gitplay/config.toml"))
            .filter(|path| path.exists())
    }

    fn read(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the pacing multiplier.
    ///
    /// Defaults to `1.0` if not configured.
    pub fn speed(&self) -> f64 {
        self.file
            .pacing
            .as_ref()
            .and_then(|p| p.speed)
            .unwrap_or(1.0)
    }

    /// Get the commit author.
    ///
    /// Defaults to "User" if not configured.
    pub fn author(&self) -> &str {
        self.playground()
            .and_then(|p| p.author.as_deref())
            .unwrap_or("User")
    }

    /// Get the commit email.
    ///
    /// Defaults to "user@example.com" if not configured.
    pub fn email(&self) -> &str {
        self.playground()
            .and_then(|p| p.email.as_deref())
            .unwrap_or("user@example.com")
    }

    /// Get the default remote name.
    ///
    /// Defaults to "origin" if not configured.
    pub fn remote(&self) -> &str {
        self.playground()
            .and_then(|p| p.remote.as_deref())
            .unwrap_or("origin")
    }

    /// Get the sample files.
    pub fn sample_files(&self) -> Vec<String> {
        match self.playground().and_then(|p| p.sample_files.as_ref()) {
            Some(files) => files.clone(),
            None => DEFAULT_SAMPLE_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check if transcripts should be printed in wire form.
    ///
    /// Defaults to `false` if not configured.
    pub fn wire(&self) -> bool {
        self.file
            .output
            .as_ref()
            .and_then(|o| o.wire)
            .unwrap_or(false)
    }

    /// Build the fresh-repository template from this config.
    pub fn template(&self) -> Template {
        Template {
            author: self.author().to_string(),
            email: self.email().to_string(),
            sample_files: self.sample_files(),
            default_remote: self.remote().to_string(),
        }
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn playground(&self) -> Option<&PlaygroundConfig> {
        self.file.playground.as_ref()
    }
}
