//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read config from {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid config: {message}")]
    Invalid { message: String },

    #[error("duplicate installation name: {name}")]
    DuplicateInstallation { name: String },

    #[error("no step named {name} in configuration")]
    StepNotFound { name: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } | Self::ReadError { .. } => {
                Some("Provide a configuration file with --config or create stepx.toml.")
            }
            Self::ParseError { .. } | Self::Invalid { .. } => {
                Some("Fix the configuration value and retry the command.")
            }
            Self::DuplicateInstallation { .. } => {
                Some("Installation names must be unique; rename one of the entries.")
            }
            Self::StepNotFound { .. } => {
                Some("List configured steps with `stepx steps` or check the name for typos.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "config.not_found",
            Self::ReadError { .. } => "config.read_error",
            Self::ParseError { .. } => "config.parse_error",
            Self::Invalid { .. } => "config.invalid",
            Self::DuplicateInstallation { .. } => "config.duplicate_installation",
            Self::StepNotFound { .. } => "config.step_not_found",
        };
        Some(code)
    }
}
