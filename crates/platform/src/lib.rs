#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Process launching for the stepx build-step executor
//!
//! This crate owns the narrow seam between the executor and the operating
//! system: an owned command description (`PlatformCommand`), the
//! `ProcessLauncher` trait the executor calls, and the default
//! `LocalLauncher` implementation over `tokio::process`. Hosts embedding
//! the executor substitute their own launcher (remote agents, containers)
//! behind the same trait.

mod process;

pub use process::{LocalLauncher, PlatformCommand, ProcessLauncher};
