//! Runner error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running a test suite
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No search directory contains the runner executable
    #[error("Could not find {name} in any of {searched} search directories")]
    ExecutableNotFound {
        /// Executable file name
        name: String,
        /// Number of directories searched
        searched: usize,
    },

    /// The test library does not exist
    #[error("Test library not found: {}", .0.display())]
    TestLibraryNotFound(PathBuf),

    /// The runner process could not be started
    #[error("Failed to start {}: {source}", executable.display())]
    Spawn {
        /// Executable that failed to start
        executable: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}
