//! Command nature error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NatureError {
    /// A persisted step references a nature identifier that is not in the
    /// catalog — typically configuration written by a newer or older
    /// version. Never silently mapped to a default nature.
    #[error("unknown command nature: {identifier}")]
    UnknownNature { identifier: String },
}

impl UserFacingError for NatureError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownNature { .. } => {
                Some("Update the step configuration to use one of the supported natures.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::UnknownNature { .. } => Some("nature.unknown_nature"),
        }
    }
}
