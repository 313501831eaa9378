//! Build step execution error types
//!
//! Non-zero exit codes are never represented here: they are data, reduced
//! to a verdict through the step's ignore-exit-code flag. Missing
//! installations and interpreters are not here either — those are soft
//! configuration gaps absorbed into a false verdict. Only hard faults in
//! the step machinery itself appear.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum StepError {
    /// The command text could not be written out as a script artifact
    #[error("failed to materialize command script: {message}")]
    ScriptMaterialization { message: String },
}

impl UserFacingError for StepError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ScriptMaterialization { .. } => {
                Some("Ensure the temporary directory is writable on the build node.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ScriptMaterialization { .. } => "step.script_materialization",
        };
        Some(code)
    }
}
