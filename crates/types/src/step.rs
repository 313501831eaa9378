//! Build step request and result types

use serde::{Deserialize, Serialize};

/// One persisted build step: which toolchain to use, how to interpret the
/// command text, and whether a non-zero exit code fails the build.
///
/// The installation and nature are referenced by name only and resolved
/// lazily at execution time, so a request can always be constructed from a
/// stored configuration record even when the names are (temporarily)
/// invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStepRequest {
    /// Name of the installation to run against
    pub installation: String,
    /// Identifier of the command nature
    pub nature: String,
    /// Raw user-supplied command text
    pub command: String,
    /// Do not consider the step failed on a non-zero exit code
    #[serde(default)]
    pub ignore_exit_code: bool,
}

impl BuildStepRequest {
    /// Create a new request
    #[must_use]
    pub fn new(
        installation: impl Into<String>,
        nature: impl Into<String>,
        command: impl Into<String>,
        ignore_exit_code: bool,
    ) -> Self {
        Self {
            installation: installation.into(),
            nature: nature.into(),
            command: command.into(),
            ignore_exit_code,
        }
    }
}

/// Outcome of one step execution
///
/// Transient — computed from the exit code and the request's ignore flag,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code of the launched process
    pub exit_code: i32,
    /// Pass/fail verdict: `ignore_exit_code || exit_code == 0`
    pub verdict: bool,
}

impl ExecutionResult {
    /// Reduce an exit code to a verdict through the ignore flag
    #[must_use]
    pub fn from_exit_code(exit_code: i32, ignore_exit_code: bool) -> Self {
        Self {
            exit_code,
            verdict: ignore_exit_code || exit_code == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_follows_exit_code() {
        assert!(ExecutionResult::from_exit_code(0, false).verdict);
        assert!(!ExecutionResult::from_exit_code(1, false).verdict);
        assert!(!ExecutionResult::from_exit_code(-1, false).verdict);
    }

    #[test]
    fn ignore_flag_forces_pass() {
        assert!(ExecutionResult::from_exit_code(0, true).verdict);
        assert!(ExecutionResult::from_exit_code(2, true).verdict);
        assert!(ExecutionResult::from_exit_code(127, true).verdict);
    }
}
