//! Process execution operations

use async_trait::async_trait;
use std::path::PathBuf;
use stepx_errors::{Error, PlatformError};
use stepx_types::EnvMap;
use tracing::debug;

/// Platform-agnostic command description
///
/// Built by the executor from a materialized script and the resolved
/// build environment, then handed to a [`ProcessLauncher`]. Owns all of
/// its data so it can cross task and trait-object boundaries freely.
#[derive(Debug, Clone)]
pub struct PlatformCommand {
    program: PathBuf,
    args: Vec<String>,
    env: EnvMap,
    current_dir: Option<PathBuf>,
    visible_console: bool,
}

impl PlatformCommand {
    /// Create a new platform command
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: EnvMap::new(),
            current_dir: None,
            visible_console: false,
        }
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Set one environment variable
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Replace the environment with the given map
    ///
    /// The launched process sees exactly this environment, nothing
    /// inherited — the resolved build environment is authoritative.
    pub fn envs(&mut self, env: EnvMap) -> &mut Self {
        self.env = env;
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Request a visible/interactive console for the process
    ///
    /// Only meaningful on platforms that distinguish windowed processes;
    /// on unix the flag is recorded but has no spawn-time effect.
    pub fn visible_console(&mut self, visible: bool) -> &mut Self {
        self.visible_console = visible;
        self
    }

    /// Get the program path
    #[must_use]
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Get the arguments
    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the environment map
    #[must_use]
    pub fn get_env(&self) -> &EnvMap {
        &self.env
    }

    /// Get the working directory
    #[must_use]
    pub fn get_current_dir(&self) -> Option<&PathBuf> {
        self.current_dir.as_ref()
    }

    /// Whether a visible console was requested
    #[must_use]
    pub fn is_visible_console(&self) -> bool {
        self.visible_console
    }
}

/// Trait for process launching operations
///
/// One call per build step: spawn, wait, report the exit code. A launch
/// that cannot spawn at all is a hard fault; termination without an exit
/// code (signal/kill) is cancellation. Non-zero exit codes are returned
/// as data, never as errors.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Launch the command and wait for its exit code
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::LaunchFailed` if the process cannot be
    /// spawned, and `Error::Cancelled` if it terminates without an exit
    /// code (killed or interrupted).
    async fn launch(&self, command: PlatformCommand) -> Result<i32, Error>;
}

/// Default launcher running processes on the local node
///
/// Stdout/stderr are inherited so step output streams straight into the
/// surrounding job log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLauncher;

impl LocalLauncher {
    /// Create a new local launcher
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessLauncher for LocalLauncher {
    async fn launch(&self, command: PlatformCommand) -> Result<i32, Error> {
        let program = command.program().to_path_buf();

        let mut cmd = tokio::process::Command::new(&program);
        cmd.args(command.get_args());
        cmd.env_clear();
        cmd.envs(command.get_env());
        if let Some(dir) = command.get_current_dir() {
            cmd.current_dir(dir);
        }

        debug!(
            program = %program.display(),
            args = ?command.get_args(),
            "spawning step process"
        );

        let mut child = cmd.spawn().map_err(|e| PlatformError::LaunchFailed {
            program: program.display().to_string(),
            message: e.to_string(),
        })?;

        let status = child.wait().await.map_err(|e| PlatformError::LaunchFailed {
            program: program.display().to_string(),
            message: e.to_string(),
        })?;

        match status.code() {
            Some(code) => Ok(code),
            // Killed by a signal: surface as cancellation, never as a verdict
            None => {
                debug!(program = %program.display(), "step process terminated by signal");
                Err(Error::Cancelled)
            }
        }
    }
}
