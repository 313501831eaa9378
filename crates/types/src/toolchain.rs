//! Resolved toolchain types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named toolchain installation with a filesystem home
///
/// Installations are created and removed by configuration; the executor
/// only looks one up by name per execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    /// Unique human-readable name (e.g. `cpy311`)
    pub name: String,
    /// Home directory of the toolchain
    pub home: PathBuf,
}

impl Installation {
    /// Create a new installation record
    #[must_use]
    pub fn new(name: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            home: home.into(),
        }
    }

    /// The `bin` directory under the installation home
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.home.join("bin")
    }
}

/// A resolved interpreter binary inside an installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreter {
    /// Absolute path to the interpreter executable
    pub binary: PathBuf,
}

impl Interpreter {
    /// Create a new interpreter record
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path to the interpreter executable
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_dir_is_under_home() {
        let installation = Installation::new("cpy311", "/opt/toolchains/cpy311");
        assert_eq!(
            installation.bin_dir(),
            PathBuf::from("/opt/toolchains/cpy311/bin")
        );
    }
}
