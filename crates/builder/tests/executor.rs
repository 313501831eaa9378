//! Integration tests for the step executor
//!
//! The collaborator seams are mocked so every branch of the soft-gap /
//! hard-fault split can be driven; the end-to-end tests at the bottom run
//! real processes through the local launcher.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use stepx_builder::{
    execute, EnvironmentResolver, InstallationResolver, InterpreterResolver, StaticInstallations,
    StepContext,
};
use stepx_errors::{Error, NatureError, PlatformError};
use stepx_events::{AppEvent, StepEvent};
use stepx_platform::{PlatformCommand, ProcessLauncher};
use stepx_types::{BuildStepRequest, EnvMap, Installation, Interpreter};

struct FixedEnvironment(Option<EnvMap>);

impl FixedEnvironment {
    fn with_vars(vars: &[(&str, &str)]) -> Self {
        Self(Some(
            vars.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        ))
    }

    fn absent() -> Self {
        Self(None)
    }
}

impl EnvironmentResolver for FixedEnvironment {
    fn current_environment(&self) -> Option<EnvMap> {
        self.0.clone()
    }
}

struct FixedInterpreter(Option<Interpreter>);

#[async_trait]
impl InterpreterResolver for FixedInterpreter {
    async fn find(&self, _home: &Path) -> Option<Interpreter> {
        self.0.clone()
    }
}

/// Launcher that records every command and reports a fixed exit code
struct RecordingLauncher {
    exit_code: i32,
    calls: Mutex<Vec<PlatformCommand>>,
}

impl RecordingLauncher {
    fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<PlatformCommand> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessLauncher for RecordingLauncher {
    async fn launch(&self, command: PlatformCommand) -> Result<i32, Error> {
        self.calls.lock().unwrap().push(command);
        Ok(self.exit_code)
    }
}

/// Launcher that always reports a spawn fault
struct FailingLauncher;

#[async_trait]
impl ProcessLauncher for FailingLauncher {
    async fn launch(&self, command: PlatformCommand) -> Result<i32, Error> {
        Err(PlatformError::LaunchFailed {
            program: command.program().display().to_string(),
            message: "mock spawn failure".to_string(),
        }
        .into())
    }
}

fn installations() -> StaticInstallations {
    StaticInstallations::new(vec![Installation::new("cpy311", "/opt/toolchains/cpy311")])
}

fn interpreter() -> FixedInterpreter {
    FixedInterpreter(Some(Interpreter::new(
        "/opt/toolchains/cpy311/bin/python3",
    )))
}

fn request(nature: &str, ignore_exit_code: bool) -> BuildStepRequest {
    BuildStepRequest::new("cpy311", nature, "tox -e py311", ignore_exit_code)
}

#[tokio::test]
async fn absent_environment_short_circuits_to_false() {
    let environment = FixedEnvironment::absent();
    let installations = installations();
    let interpreters = interpreter();
    let launcher = RecordingLauncher::new(0);
    let (tx, mut rx) = stepx_events::channel();

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher)
        .with_event_sender(tx);

    let verdict = execute(&request("shell", false), &ctx).await.unwrap();
    assert!(!verdict);

    // No launch, no events: this is a no-op short-circuit
    assert!(launcher.calls().is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn missing_installation_is_a_soft_failure() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = StaticInstallations::new(Vec::new());
    let interpreters = interpreter();
    let launcher = RecordingLauncher::new(0);
    let (tx, mut rx) = stepx_events::channel();

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher)
        .with_event_sender(tx);

    let verdict = execute(&request("shell", false), &ctx).await.unwrap();
    assert!(!verdict);
    assert!(launcher.calls().is_empty());

    // Started, then the diagnostic for the missing installation
    assert!(matches!(
        rx.try_recv().unwrap(),
        AppEvent::Step(StepEvent::Started { .. })
    ));
    match rx.try_recv().unwrap() {
        AppEvent::Step(StepEvent::InstallationNotFound { name, .. }) => {
            assert_eq!(name, "cpy311");
        }
        other => panic!("expected InstallationNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_interpreter_is_a_soft_failure() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = installations();
    let interpreters = FixedInterpreter(None);
    let launcher = RecordingLauncher::new(0);
    let (tx, mut rx) = stepx_events::channel();

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher)
        .with_event_sender(tx);

    let verdict = execute(&request("shell", false), &ctx).await.unwrap();
    assert!(!verdict);
    assert!(launcher.calls().is_empty());

    assert!(matches!(
        rx.try_recv().unwrap(),
        AppEvent::Step(StepEvent::Started { .. })
    ));
    assert!(matches!(
        rx.try_recv().unwrap(),
        AppEvent::Step(StepEvent::InterpreterNotFound { .. })
    ));
}

#[tokio::test]
async fn zero_exit_code_passes() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = installations();
    let interpreters = interpreter();
    let launcher = RecordingLauncher::new(0);

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher);
    assert!(execute(&request("shell", false), &ctx).await.unwrap());
}

#[tokio::test]
async fn nonzero_exit_code_fails_without_error() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = installations();
    let interpreters = interpreter();
    let launcher = RecordingLauncher::new(2);

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher);
    assert!(!execute(&request("shell", false), &ctx).await.unwrap());
}

#[tokio::test]
async fn ignore_exit_code_forces_a_pass() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = installations();
    let interpreters = interpreter();
    let launcher = RecordingLauncher::new(17);
    let (tx, mut rx) = stepx_events::channel();

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher)
        .with_event_sender(tx);

    assert!(execute(&request("shell", true), &ctx).await.unwrap());

    // The completed event still carries the real exit code
    let completed = loop {
        match rx.try_recv().unwrap() {
            AppEvent::Step(StepEvent::Completed {
                exit_code, verdict, ..
            }) => break (exit_code, verdict),
            _ => {}
        }
    };
    assert_eq!(completed, (17, true));
}

#[tokio::test]
async fn unknown_nature_is_a_hard_error() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = installations();
    let interpreters = interpreter();
    let launcher = RecordingLauncher::new(0);

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher);
    let err = execute(&request("batch", false), &ctx).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Nature(NatureError::UnknownNature { .. })
    ));
    assert!(launcher.calls().is_empty());
}

#[tokio::test]
async fn launch_fault_propagates() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = installations();
    let interpreters = interpreter();
    let launcher = FailingLauncher;

    let ctx = StepContext::new("/ws", &environment, &installations, &interpreters, &launcher);
    let err = execute(&request("shell", false), &ctx).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Platform(PlatformError::LaunchFailed { .. })
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn launcher_receives_resolved_environment_and_working_dir() {
    let environment =
        FixedEnvironment::with_vars(&[("PATH", "/usr/bin"), ("TOXENV", "py311")]);
    let installations = installations();
    let interpreters = interpreter();
    let launcher = RecordingLauncher::new(0);

    let ctx = StepContext::new(
        "/workspace/job42",
        &environment,
        &installations,
        &interpreters,
        &launcher,
    );
    execute(&request("shell", false), &ctx).await.unwrap();

    let calls = launcher.calls();
    assert_eq!(calls.len(), 1);
    let command = &calls[0];

    assert_eq!(
        command.get_env().get("TOXENV").map(String::as_str),
        Some("py311")
    );
    // Shell nature prepends the toolchain bin dir to the search path
    let path = command.get_env().get("PATH").unwrap();
    assert!(path.starts_with("/opt/toolchains/cpy311/bin"));
    assert!(path.contains("/usr/bin"));
    assert_eq!(
        command.get_current_dir(),
        Some(&std::path::PathBuf::from("/workspace/job42"))
    );
}

#[tokio::test]
async fn empty_command_text_executes_for_every_nature() {
    let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin")]);
    let installations = installations();
    let interpreters = interpreter();

    for nature in ["interpreter", "shell", "xshell"] {
        let launcher = RecordingLauncher::new(0);
        let ctx =
            StepContext::new("/ws", &environment, &installations, &interpreters, &launcher);
        let request = BuildStepRequest::new("cpy311", nature, "", false);
        assert!(execute(&request, &ctx).await.unwrap());
        assert_eq!(launcher.calls().len(), 1);
    }
}

// End-to-end coverage through real processes.

#[cfg(unix)]
mod end_to_end {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use stepx_builder::HomeInterpreterResolver;
    use stepx_platform::LocalLauncher;

    /// Fake toolchain home with an executable `bin/python3` stub
    fn fake_home() -> tempfile::TempDir {
        let home = tempfile::tempdir().unwrap();
        let bin = home.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        let binary = bin.join("python3");
        std::fs::write(&binary, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
        home
    }

    #[tokio::test]
    async fn shell_step_passes_and_fails_by_exit_code() {
        let home = fake_home();
        let workspace = tempfile::tempdir().unwrap();

        let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin:/bin")]);
        let installations =
            StaticInstallations::new(vec![Installation::new("cpy311", home.path())]);
        let interpreters = HomeInterpreterResolver::new();
        let launcher = LocalLauncher::new();

        let ctx = StepContext::new(
            workspace.path(),
            &environment,
            &installations,
            &interpreters,
            &launcher,
        );

        let passing = BuildStepRequest::new("cpy311", "shell", "exit 0", false);
        assert!(execute(&passing, &ctx).await.unwrap());

        let failing = BuildStepRequest::new("cpy311", "shell", "exit 4", false);
        assert!(!execute(&failing, &ctx).await.unwrap());

        let ignored = BuildStepRequest::new("cpy311", "shell", "exit 4", true);
        assert!(execute(&ignored, &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn shell_step_sees_toolchain_bin_first_on_path() {
        let home = fake_home();
        let workspace = tempfile::tempdir().unwrap();
        let marker = workspace.path().join("which.txt");

        let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin:/bin")]);
        let installations =
            StaticInstallations::new(vec![Installation::new("cpy311", home.path())]);
        let interpreters = HomeInterpreterResolver::new();
        let launcher = LocalLauncher::new();

        let ctx = StepContext::new(
            workspace.path(),
            &environment,
            &installations,
            &interpreters,
            &launcher,
        );

        let request = BuildStepRequest::new(
            "cpy311",
            "shell",
            "command -v python3 > which.txt",
            false,
        );
        assert!(execute(&request, &ctx).await.unwrap());

        let resolved = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(
            resolved.trim(),
            home.path().join("bin/python3").to_string_lossy()
        );
    }

    #[tokio::test]
    async fn interpreter_step_runs_the_script_through_the_binary() {
        let workspace = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();

        let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin:/bin")]);
        let installations =
            StaticInstallations::new(vec![Installation::new("sh-tools", home.path())]);
        // The stand-in "interpreter" is the system shell; it runs the
        // materialized script file like any interpreter would
        let interpreters = FixedInterpreter(Some(Interpreter::new("/bin/sh")));
        let launcher = LocalLauncher::new();

        let ctx = StepContext::new(
            workspace.path(),
            &environment,
            &installations,
            &interpreters,
            &launcher,
        );

        let request = BuildStepRequest::new("sh-tools", "interpreter", "exit 7", false);
        assert!(!execute(&request, &ctx).await.unwrap());

        let ignored = BuildStepRequest::new("sh-tools", "interpreter", "exit 7", true);
        assert!(execute(&ignored, &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn empty_shell_command_exits_zero() {
        let home = fake_home();
        let workspace = tempfile::tempdir().unwrap();

        let environment = FixedEnvironment::with_vars(&[("PATH", "/usr/bin:/bin")]);
        let installations =
            StaticInstallations::new(vec![Installation::new("cpy311", home.path())]);
        let interpreters = HomeInterpreterResolver::new();
        let launcher = LocalLauncher::new();

        let ctx = StepContext::new(
            workspace.path(),
            &environment,
            &installations,
            &interpreters,
            &launcher,
        );

        let request = BuildStepRequest::new("cpy311", "shell", "", false);
        assert!(execute(&request, &ctx).await.unwrap());
    }
}
