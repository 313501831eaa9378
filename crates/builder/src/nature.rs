//! Command natures: how raw command text becomes an executable script
//!
//! The catalog is closed and ordered; configuration records reference a
//! nature by identifier and resolution never falls back to a default.
//! Materialization writes the command text to a scoped temporary file and
//! returns the invocation recipe; it executes nothing itself.

use std::io::Write;
use std::path::{Path, PathBuf};
use stepx_errors::{Error, NatureError, Result, StepError};
use stepx_types::Interpreter;

use crate::script::ExecutableScript;

/// Execution mode of a build step's command text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandNature {
    /// Script run directly by the toolchain's interpreter binary
    Interpreter,
    /// Script run by the platform shell with the toolchain's bin
    /// directory prepended to the search path
    Shell,
    /// Same as [`Self::Shell`], marked to run with a visible console
    XShell,
}

impl CommandNature {
    /// The full catalog, in declaration order (also the display order)
    pub const ALL: [Self; 3] = [Self::Interpreter, Self::Shell, Self::XShell];

    /// Stable identifier persisted in step configuration
    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Interpreter => "interpreter",
            Self::Shell => "shell",
            Self::XShell => "xshell",
        }
    }

    /// Human-readable label for selection controls
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Interpreter => "Native interpreter script",
            Self::Shell => "Shell script",
            Self::XShell => "Shell script in a visible console",
        }
    }

    /// Look up a nature by its persisted identifier
    ///
    /// # Errors
    ///
    /// Returns `NatureError::UnknownNature` when the identifier is not in
    /// the catalog — typically a step saved by a version with a different
    /// nature set. There is deliberately no default fallback.
    pub fn resolve(identifier: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|nature| nature.identifier() == identifier)
            .ok_or_else(|| {
                NatureError::UnknownNature {
                    identifier: identifier.to_string(),
                }
                .into()
            })
    }

    /// Write the command text to a scoped temporary script and return the
    /// invocation recipe for it
    ///
    /// Empty command text produces an empty script, which every nature
    /// runs successfully by platform convention — no special-casing.
    /// The returned value owns the temp file; it is deleted when the
    /// value is dropped, on every exit path.
    ///
    /// # Errors
    ///
    /// Returns `StepError::ScriptMaterialization` if the temporary file
    /// cannot be created or written.
    pub fn materialize(
        self,
        installation_home: &Path,
        interpreter: &Interpreter,
        command_text: &str,
    ) -> Result<ExecutableScript> {
        let script = write_script(self.script_suffix(), command_text)?;
        let script_arg = script.to_string_lossy().into_owned();

        let executable = match self {
            Self::Interpreter => ExecutableScript::new(
                script,
                interpreter.binary().to_path_buf(),
                vec![script_arg],
                None,
                false,
            ),
            Self::Shell => shell_script(script, script_arg, installation_home, false),
            Self::XShell => shell_script(script, script_arg, installation_home, true),
        };
        Ok(executable)
    }

    fn script_suffix(self) -> &'static str {
        match self {
            Self::Interpreter => ".script",
            #[cfg(unix)]
            Self::Shell | Self::XShell => ".sh",
            #[cfg(windows)]
            Self::Shell | Self::XShell => ".bat",
        }
    }
}

impl std::fmt::Display for CommandNature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Write the command text to a named temporary file
fn write_script(suffix: &str, command_text: &str) -> Result<tempfile::TempPath> {
    let write = || -> std::io::Result<tempfile::TempPath> {
        let mut file = tempfile::Builder::new()
            .prefix("stepx-")
            .suffix(suffix)
            .tempfile()?;
        file.write_all(command_text.as_bytes())?;
        file.flush()?;
        Ok(file.into_temp_path())
    };
    write().map_err(|e| {
        Error::from(StepError::ScriptMaterialization {
            message: e.to_string(),
        })
    })
}

#[cfg(unix)]
fn shell_script(
    script: tempfile::TempPath,
    script_arg: String,
    installation_home: &Path,
    visible_console: bool,
) -> ExecutableScript {
    // -xe mirrors the job-log conventions of CI shells: echo commands,
    // stop at the first failing one
    ExecutableScript::new(
        script,
        PathBuf::from("/bin/sh"),
        vec!["-xe".to_string(), script_arg],
        Some(installation_home.join("bin")),
        visible_console,
    )
}

#[cfg(windows)]
fn shell_script(
    script: tempfile::TempPath,
    script_arg: String,
    installation_home: &Path,
    visible_console: bool,
) -> ExecutableScript {
    ExecutableScript::new(
        script,
        PathBuf::from("cmd.exe"),
        vec!["/c".to_string(), "call".to_string(), script_arg],
        Some(installation_home.join("bin")),
        visible_console,
    )
}
