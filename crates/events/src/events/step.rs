use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Build step lifecycle events
///
/// One `step_id` identifies a single `execute` invocation; concurrent
/// matrix cells each carry their own id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StepEvent {
    /// Step execution started
    Started {
        step_id: String,
        installation: String,
        nature: String,
    },

    /// The named installation could not be resolved; the step yields a
    /// false verdict without launching anything
    InstallationNotFound { step_id: String, name: String },

    /// No interpreter was found under the installation home; the step
    /// yields a false verdict without launching anything
    InterpreterNotFound { step_id: String, home: PathBuf },

    /// Command text was written to a temporary script
    ScriptMaterialized {
        step_id: String,
        program: PathBuf,
        script: PathBuf,
    },

    /// Step execution finished with an exit code
    Completed {
        step_id: String,
        exit_code: i32,
        verdict: bool,
        duration: Duration,
    },
}

impl StepEvent {
    /// The step invocation this event belongs to
    #[must_use]
    pub fn step_id(&self) -> &str {
        match self {
            Self::Started { step_id, .. }
            | Self::InstallationNotFound { step_id, .. }
            | Self::InterpreterNotFound { step_id, .. }
            | Self::ScriptMaterialized { step_id, .. }
            | Self::Completed { step_id, .. } => step_id,
        }
    }
}
