//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order of precedence:
//! 1. `$GITPLAY_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitplay/config.toml`
//! 3. `~/.gitplay/config.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g. pacing speed must be a
//! finite, non-negative multiplier).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// The user's configuration file.
///
/// # Example
///
/// ```toml
/// [pacing]
/// speed = 0.5
///
/// [playground]
/// sample_files = ["index.html", "styles.css", "app.js"]
/// author = "Ada"
/// email = "ada@example.com"
/// remote = "origin"
///
/// [output]
/// wire = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Simulated delay settings
    pub pacing: Option<PacingConfig>,

    /// Fresh repository settings
    pub playground: Option<PlaygroundConfig>,

    /// Transcript rendering
    pub output: Option<OutputConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pacing) = &self.pacing {
            pacing.validate()?;
        }
        if let Some(playground) = &self.playground {
            playground.validate()?;
        }
        Ok(())
    }
}

/// Pacing of simulated delays.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PacingConfig {
    /// Multiplier applied to every delay (0 disables pacing)
    pub speed: Option<f64>,
}

impl PacingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(speed) = self.speed {
            if !speed.is_finite() || speed < 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "pacing speed must be a finite number >= 0, got {speed}"
                )));
            }
        }
        Ok(())
    }
}

/// Settings for freshly created repositories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlaygroundConfig {
    /// Files placed in the working directory by `init` and reset
    pub sample_files: Option<Vec<String>>,

    /// Author recorded on local commits
    pub author: Option<String>,

    /// Email recorded on local commits
    pub email: Option<String>,

    /// Remote used when push/fetch/pull name none (default: "origin")
    pub remote: Option<String>,
}

impl PlaygroundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(files) = &self.sample_files {
            let mut seen = HashSet::new();
            for path in files {
                if path.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "sample file paths cannot be empty".to_string(),
                    ));
                }
                if path.chars().any(char::is_whitespace) {
                    return Err(ConfigError::InvalidValue(format!(
                        "sample file path cannot contain whitespace: '{path}'"
                    )));
                }
                if !seen.insert(path.as_str()) {
                    return Err(ConfigError::InvalidValue(format!(
                        "duplicate sample file '{path}'"
                    )));
                }
            }
        }

        for (key, value) in [("author", &self.author), ("email", &self.email)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{key} cannot be empty")));
            }
        }

        if let Some(remote) = &self.remote {
            if remote.is_empty() || remote.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid remote name '{remote}'"
                )));
            }
        }

        Ok(())
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Print transcripts in the single-line `\n` wire form
    pub wire: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod file_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = FileConfig::default();
            assert!(config.pacing.is_none());
            assert!(config.playground.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn parses_all_sections() {
            let toml = r#"
                [pacing]
                speed = 0.25

                [playground]
                sample_files = ["a.txt"]
                author = "Ada"
                email = "ada@example.com"
                remote = "upstream"

                [output]
                wire = true
            "#;

            let config: FileConfig = toml::from_str(toml).unwrap();
            assert_eq!(config.pacing.unwrap().speed, Some(0.25));
            let playground = config.playground.unwrap();
            assert_eq!(playground.sample_files, Some(vec!["a.txt".to_string()]));
            assert_eq!(playground.remote.as_deref(), Some("upstream"));
            assert_eq!(config.output.unwrap().wire, Some(true));
        }

        #[test]
        fn roundtrip() {
            let config = FileConfig {
                pacing: Some(PacingConfig { speed: Some(2.0) }),
                playground: Some(PlaygroundConfig {
                    author: Some("Ada".to_string()),
                    ..Default::default()
                }),
                output: Some(OutputConfig { wire: Some(false) }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: FileConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }

        #[test]
        fn reject_unknown_fields() {
            let toml = r#"
                [pacing]
                speed = 1.0
                turbo = true
            "#;

            let result: Result<FileConfig, _> = toml::from_str(toml);
            assert!(result.is_err());
        }
    }

    mod pacing {
        use super::*;

        #[test]
        fn zero_is_valid() {
            let config = PacingConfig { speed: Some(0.0) };
            assert!(config.validate().is_ok());
        }

        #[test]
        fn negative_rejected() {
            let config = PacingConfig { speed: Some(-1.0) };
            assert!(config.validate().is_err());
        }

        #[test]
        fn non_finite_rejected() {
            for speed in [f64::NAN, f64::INFINITY] {
                let config = PacingConfig { speed: Some(speed) };
                assert!(config.validate().is_err());
            }
        }
    }

    mod playground {
        use super::*;

        #[test]
        fn duplicate_sample_files_rejected() {
            let config = PlaygroundConfig {
                sample_files: Some(vec!["a".into(), "a".into()]),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn blank_sample_file_rejected() {
            let config = PlaygroundConfig {
                sample_files: Some(vec!["  ".into()]),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_author_rejected() {
            let config = PlaygroundConfig {
                author: Some(String::new()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn remote_with_space_rejected() {
            let config = PlaygroundConfig {
                remote: Some("my remote".into()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_sample_list_allowed() {
            let config = PlaygroundConfig {
                sample_files: Some(vec![]),
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }
}
