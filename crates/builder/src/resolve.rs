//! Collaborator seams for step execution
//!
//! The executor consumes its surroundings through narrow interfaces:
//! where the build's environment comes from, how installation names map
//! to toolchains, and how a toolchain home yields an interpreter. Hosts
//! embedding the executor provide their own implementations; the types
//! here are the defaults used by the CLI.
//!
//! All three resolvers answer with `Option` — absence is an expected
//! configuration gap that the executor absorbs into a false verdict, not
//! an error condition.

use async_trait::async_trait;
use std::path::Path;
use stepx_types::{EnvMap, Installation, Interpreter};
use tracing::debug;

/// Source of the build's resolved environment variables
///
/// `None` means the build no longer has a valid environment (for example
/// it was aborted concurrently); the executor short-circuits to a false
/// verdict with no further side effects.
pub trait EnvironmentResolver: Send + Sync {
    /// The environment the step should run in, or `None` if the build is
    /// no longer valid
    fn current_environment(&self) -> Option<EnvMap>;
}

/// Lookup of toolchain installations by configured name
pub trait InstallationResolver: Send + Sync {
    /// Find the installation with the given name
    fn find(&self, name: &str) -> Option<Installation>;
}

/// Lookup of the interpreter binary inside an installation home
#[async_trait]
pub trait InterpreterResolver: Send + Sync {
    /// Find the interpreter for the given installation home
    async fn find(&self, home: &Path) -> Option<Interpreter>;
}

/// Environment resolver that hands the step the worker's own environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Create a new process environment resolver
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentResolver for ProcessEnvironment {
    fn current_environment(&self) -> Option<EnvMap> {
        Some(std::env::vars().collect())
    }
}

/// Installation resolver over a fixed list (typically from configuration)
#[derive(Debug, Clone, Default)]
pub struct StaticInstallations {
    installations: Vec<Installation>,
}

impl StaticInstallations {
    /// Create a resolver over the given installations
    #[must_use]
    pub fn new(installations: Vec<Installation>) -> Self {
        Self { installations }
    }
}

impl InstallationResolver for StaticInstallations {
    fn find(&self, name: &str) -> Option<Installation> {
        self.installations
            .iter()
            .find(|installation| installation.name == name)
            .cloned()
    }
}

/// Interpreter resolver that searches the installation home
///
/// Candidates are tried in order against `<home>/bin` and then `<home>`
/// itself; the first executable found wins. Hosts with their own layout
/// conventions substitute a different implementation.
#[derive(Debug, Clone)]
pub struct HomeInterpreterResolver {
    candidates: Vec<String>,
}

impl HomeInterpreterResolver {
    /// Create a resolver with the default candidate binaries
    #[must_use]
    pub fn new() -> Self {
        Self {
            candidates: vec!["python3".to_string(), "python".to_string()],
        }
    }

    /// Replace the candidate binary names
    #[must_use]
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for HomeInterpreterResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterpreterResolver for HomeInterpreterResolver {
    async fn find(&self, home: &Path) -> Option<Interpreter> {
        let search_path = std::env::join_paths([home.join("bin"), home.to_path_buf()]).ok()?;
        for candidate in &self.candidates {
            if let Ok(binary) = which::which_in(candidate, Some(&search_path), home) {
                debug!(home = %home.display(), binary = %binary.display(), "resolved interpreter");
                return Some(Interpreter::new(binary));
            }
        }
        debug!(home = %home.display(), "no interpreter found in installation home");
        None
    }
}
