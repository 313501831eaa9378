//! End-to-end execution of one build step

use std::path::PathBuf;
use std::time::Instant;

use stepx_errors::Result;
use stepx_events::{AppEvent, EventEmitter, EventSender, StepEvent};
use stepx_platform::ProcessLauncher;
use stepx_types::{BuildStepRequest, ExecutionResult};
use uuid::Uuid;

use crate::nature::CommandNature;
use crate::resolve::{EnvironmentResolver, InstallationResolver, InterpreterResolver};

/// Everything one `execute` call needs from its surroundings
///
/// The executor itself holds no state between invocations; all mutable
/// context (environment, process handles) lives with the collaborators
/// referenced here, so concurrent steps for different builds need no
/// coordination.
pub struct StepContext<'a> {
    /// Working directory the step's process runs in
    pub working_dir: PathBuf,
    /// Source of the build's resolved environment
    pub environment: &'a dyn EnvironmentResolver,
    /// Lookup of installations by name
    pub installations: &'a dyn InstallationResolver,
    /// Lookup of the interpreter inside an installation home
    pub interpreters: &'a dyn InterpreterResolver,
    /// Process launcher for the materialized script
    pub launcher: &'a dyn ProcessLauncher,
    /// Event sender for progress reporting
    pub event_sender: Option<EventSender>,
}

impl EventEmitter for StepContext<'_> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl<'a> StepContext<'a> {
    /// Create a new step context
    #[must_use]
    pub fn new(
        working_dir: impl Into<PathBuf>,
        environment: &'a dyn EnvironmentResolver,
        installations: &'a dyn InstallationResolver,
        interpreters: &'a dyn InterpreterResolver,
        launcher: &'a dyn ProcessLauncher,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            environment,
            installations,
            interpreters,
            launcher,
            event_sender: None,
        }
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, event_sender: EventSender) -> Self {
        self.event_sender = Some(event_sender);
        self
    }
}

/// Run one build step and answer pass/fail.
///
/// Missing environment, installation or interpreter are soft gaps: the
/// step yields `Ok(false)` and job reporting describes the problem from
/// the emitted diagnostics instead of a stack trace. An unknown nature
/// identifier, a script that cannot be written, a launch fault or an
/// interrupted process are hard errors. A non-zero exit code is neither:
/// it is reduced to the verdict through the request's ignore flag.
///
/// # Errors
///
/// Returns `NatureError::UnknownNature` for a retired nature identifier,
/// `StepError::ScriptMaterialization` when the script cannot be written,
/// and whatever the launcher reports for launch faults or interruption.
pub async fn execute(request: &BuildStepRequest, ctx: &StepContext<'_>) -> Result<bool> {
    // An absent environment means the build went away underneath us
    // (aborted, node detached). Short-circuit without any side effects.
    let Some(environment) = ctx.environment.current_environment() else {
        return Ok(false);
    };

    let step_id = Uuid::new_v4().to_string();
    ctx.emit(AppEvent::Step(StepEvent::Started {
        step_id: step_id.clone(),
        installation: request.installation.clone(),
        nature: request.nature.clone(),
    }));

    let Some(installation) = ctx.installations.find(&request.installation) else {
        ctx.emit(AppEvent::Step(StepEvent::InstallationNotFound {
            step_id,
            name: request.installation.clone(),
        }));
        return Ok(false);
    };

    let Some(interpreter) = ctx.interpreters.find(&installation.home).await else {
        ctx.emit(AppEvent::Step(StepEvent::InterpreterNotFound {
            step_id,
            home: installation.home.clone(),
        }));
        return Ok(false);
    };

    let nature = CommandNature::resolve(&request.nature)?;
    let script = nature.materialize(&installation.home, &interpreter, &request.command)?;
    ctx.emit(AppEvent::Step(StepEvent::ScriptMaterialized {
        step_id: step_id.clone(),
        program: script.program().to_path_buf(),
        script: script.script_path().to_path_buf(),
    }));

    let command = script.to_command(&environment, &ctx.working_dir)?;
    let started = Instant::now();
    let exit_code = ctx.launcher.launch(command).await?;

    let result = ExecutionResult::from_exit_code(exit_code, request.ignore_exit_code);
    ctx.emit(AppEvent::Step(StepEvent::Completed {
        step_id,
        exit_code: result.exit_code,
        verdict: result.verdict,
        duration: started.elapsed(),
    }));

    // `script` lives until here, so the temp file outlived the process
    Ok(result.verdict)
}
