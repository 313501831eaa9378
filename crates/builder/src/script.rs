//! Materialized script artifacts

use std::path::{Path, PathBuf};
use stepx_errors::{Error, Result};
use stepx_platform::PlatformCommand;
use stepx_types::EnvMap;
use tempfile::TempPath;

/// A command text materialized into an invocable script
///
/// Owns the temporary script file: dropping the value deletes the file,
/// on success and failure paths alike. The artifact is scoped to a single
/// execution and must outlive the launched process, so the executor keeps
/// it alive until the launcher returns.
#[derive(Debug)]
pub struct ExecutableScript {
    script: TempPath,
    program: PathBuf,
    args: Vec<String>,
    path_prepend: Option<PathBuf>,
    visible_console: bool,
}

impl ExecutableScript {
    pub(crate) fn new(
        script: TempPath,
        program: PathBuf,
        args: Vec<String>,
        path_prepend: Option<PathBuf>,
        visible_console: bool,
    ) -> Self {
        Self {
            script,
            program,
            args,
            path_prepend,
            visible_console,
        }
    }

    /// Path of the temporary script file
    #[must_use]
    pub fn script_path(&self) -> &Path {
        &self.script
    }

    /// Program that will be invoked
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Invocation arguments (interpreter flags plus the script path)
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Directory prepended to the PATH of the launched process, if any
    #[must_use]
    pub fn path_prepend(&self) -> Option<&Path> {
        self.path_prepend.as_deref()
    }

    /// Whether the process should run with a visible console
    #[must_use]
    pub fn is_visible_console(&self) -> bool {
        self.visible_console
    }

    /// Assemble the platform command for this script
    ///
    /// The resolved build environment is taken as-is; when the nature
    /// requested a PATH prepend, the toolchain's bin directory is joined
    /// in front of the environment's existing search path.
    ///
    /// # Errors
    ///
    /// Returns an error if the prepend directory cannot be joined into a
    /// valid PATH value (e.g. it contains the path separator).
    pub fn to_command(&self, environment: &EnvMap, working_dir: &Path) -> Result<PlatformCommand> {
        let mut env = environment.clone();
        if let Some(prepend) = &self.path_prepend {
            let existing = env.get("PATH").cloned().unwrap_or_default();
            let joined = std::env::join_paths(
                std::iter::once(prepend.clone()).chain(std::env::split_paths(&existing)),
            )
            .map_err(|e| Error::internal(format!("invalid PATH entry: {e}")))?;
            env.insert("PATH".to_string(), joined.to_string_lossy().into_owned());
        }

        let mut command = PlatformCommand::new(&self.program);
        command
            .args(&self.args)
            .envs(env)
            .current_dir(working_dir)
            .visible_console(self.visible_console);
        Ok(command)
    }
}
