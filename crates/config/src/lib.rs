#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for stepx
//!
//! This crate loads the job configuration file (`stepx.toml` in the
//! working directory by default): the toolchain installations available
//! on the node, the named build steps, and an optional matrix axis
//! definition. Step records reference installations and natures by name
//! only; dangling references are allowed here because resolution is lazy
//! — they surface at execution time, not at load time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stepx_errors::{ConfigError, Error};
use stepx_matrix::Axis;
use stepx_types::{BuildStepRequest, Installation};
use tokio::fs;

/// File name looked up in the working directory when no path is given
pub const DEFAULT_FILE_NAME: &str = "stepx.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Toolchain installations available on this node
    #[serde(default, rename = "installation")]
    pub installations: Vec<InstallationConfig>,

    /// Named build steps
    #[serde(default, rename = "step")]
    pub steps: Vec<StepConfig>,

    /// Optional matrix axis definition
    #[serde(default)]
    pub axis: Option<AxisConfig>,
}

/// One `[[installation]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationConfig {
    pub name: String,
    pub home: PathBuf,
}

/// One `[[step]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    pub name: String,
    pub installation: String,
    #[serde(default = "default_nature")]
    pub nature: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub ignore_exit_code: bool,
}

/// The `[axis]` table: selected defaults plus free-form extras
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default = "default_axis_values")]
    pub values: Vec<String>,
    #[serde(default)]
    pub extra_value_string: String,
}

fn default_nature() -> String {
    "shell".to_string()
}

fn default_axis_values() -> Vec<String> {
    stepx_matrix::DEFAULTS
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the contents are not
    /// valid TOML, or validation fails.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::ReadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// Looks for [`DEFAULT_FILE_NAME`] in the current directory; an
    /// absent file yields the default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be
    /// read or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = PathBuf::from(DEFAULT_FILE_NAME);

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Validate cross-record invariants
    ///
    /// Installation names must be unique — the executor resolves by name.
    /// Step → installation references are intentionally NOT checked:
    /// resolution is lazy and a missing installation is a soft failure at
    /// execution time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateInstallation` on a repeated name.
    pub fn validate(&self) -> Result<(), Error> {
        let mut seen = std::collections::HashSet::new();
        for installation in &self.installations {
            if !seen.insert(installation.name.as_str()) {
                return Err(ConfigError::DuplicateInstallation {
                    name: installation.name.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Look up a step by name
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::StepNotFound` if no step has the given name.
    pub fn step(&self, name: &str) -> Result<&StepConfig, Error> {
        self.steps
            .iter()
            .find(|step| step.name == name)
            .ok_or_else(|| {
                ConfigError::StepNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// The configured installations as resolved toolchain records
    #[must_use]
    pub fn installations(&self) -> Vec<Installation> {
        self.installations
            .iter()
            .map(|i| Installation::new(&i.name, &i.home))
            .collect()
    }

    /// The configured matrix axis, if any
    #[must_use]
    pub fn axis(&self) -> Option<Axis> {
        self.axis.as_ref().map(AxisConfig::to_axis)
    }
}

impl StepConfig {
    /// Convert this record into an executable step request
    #[must_use]
    pub fn to_request(&self) -> BuildStepRequest {
        BuildStepRequest::new(
            &self.installation,
            &self.nature,
            &self.command,
            self.ignore_exit_code,
        )
    }
}

impl AxisConfig {
    /// Build the axis value object from this record
    #[must_use]
    pub fn to_axis(&self) -> Axis {
        let extra = if self.extra_value_string.is_empty() {
            None
        } else {
            Some(self.extra_value_string.as_str())
        };
        Axis::new(&self.values, extra)
    }
}
