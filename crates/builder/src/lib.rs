#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Build step execution for stepx
//!
//! This crate turns one persisted [`BuildStepRequest`] into a pass/fail
//! verdict: resolve the named installation and its interpreter,
//! materialize the command text into a script according to the step's
//! command nature, launch it inside the resolved build environment, and
//! reduce the exit code through the ignore-exit-code flag.
//!
//! Missing configuration (environment, installation, interpreter) yields
//! a false verdict without an error so the surrounding job reporting can
//! describe it normally; infrastructure faults (script materialization,
//! launch failure, interruption) propagate as errors.
//!
//! [`BuildStepRequest`]: stepx_types::BuildStepRequest

mod executor;
mod nature;
mod resolve;
mod script;

pub use executor::{execute, StepContext};
pub use nature::CommandNature;
pub use resolve::{
    EnvironmentResolver, HomeInterpreterResolver, InstallationResolver, InterpreterResolver,
    ProcessEnvironment, StaticInstallations,
};
pub use script::ExecutableScript;
