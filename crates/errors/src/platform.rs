//! Platform process error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum PlatformError {
    /// The process could not be spawned at all (missing binary, permission
    /// problem, resource exhaustion). Distinct from a non-zero exit code.
    /// Termination without an exit code is not represented here; it maps
    /// to top-level cancellation.
    #[error("failed to launch {program}: {message}")]
    LaunchFailed { program: String, message: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::LaunchFailed { .. } => {
                Some("Verify the program exists and is executable on this node.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::LaunchFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::LaunchFailed { .. } => "platform.launch_failed",
        };
        Some(code)
    }
}
