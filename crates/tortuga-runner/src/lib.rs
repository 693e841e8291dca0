//! Tortuga console test runner
//!
//! Runs a selection of tests from a compiled test library through an
//! external console runner and reports whether the suite passed.
//!
//! A [`ConsoleTestRunner`] describes one runner: the executable it looks for,
//! where it looks, how it builds the command line and how it reads the exit
//! code. Locating and spawning the process are shared provided methods.
//! [`MsTestRunner`] drives `MSTest.exe`.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
pub mod mstest;

pub use error::RunnerError;
pub use mstest::{MsTestRunner, RunnerConfig, SearchEnvironment, MSTEST_EXECUTABLE};

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// One `/name:value` command-line switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    /// Switch name, without the leading `/`
    pub name: String,
    /// Switch value
    pub value: String,
}

impl Switch {
    /// Create a switch
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Argument handed to the process (`/name:value`)
    pub fn to_arg(&self) -> String {
        format!("/{}:{}", self.name, self.value)
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}:\"{}\"", self.name, self.value)
    }
}

/// Outcome of one runner invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    /// Whether the suite passed
    pub passed: bool,
    /// Process exit code; `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Executable that was run
    pub executable: PathBuf,
    /// Quoted argument string, for display
    pub command_line: String,
}

/// A console program able to run selected tests from a test library
pub trait ConsoleTestRunner {
    /// File name of the runner executable
    fn executable_name(&self) -> &str;

    /// Directories searched for the executable, in priority order
    fn search_path(&self) -> Vec<PathBuf>;

    /// Command-line switches running `tests` from `test_library`
    fn arguments(&self, test_library: &Path, tests: &[String]) -> Vec<Switch>;

    /// Map a process exit code to a pass/fail verdict
    fn interpret_exit_code(&self, exit_code: i32) -> bool {
        exit_code == 0
    }

    /// Full path of the runner executable, if any search directory has it
    fn locate_executable(&self) -> Option<PathBuf> {
        self.search_path()
            .into_iter()
            .map(|dir| dir.join(self.executable_name()))
            .find(|candidate| candidate.is_file())
    }

    /// Argument string with every switch value quoted
    fn build_arguments(&self, test_library: &Path, tests: &[String]) -> String {
        self.arguments(test_library, tests)
            .iter()
            .map(Switch::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run `tests` from `test_library` and wait for the verdict
    ///
    /// # Errors
    /// * `TestLibraryNotFound` - `test_library` is not a file
    /// * `ExecutableNotFound` - No search directory contains the runner
    /// * `Spawn` - The runner process could not be started
    fn run(&self, test_library: &Path, tests: &[String]) -> Result<TestRun, RunnerError> {
        if !test_library.is_file() {
            return Err(RunnerError::TestLibraryNotFound(test_library.to_path_buf()));
        }

        let executable = self
            .locate_executable()
            .ok_or_else(|| RunnerError::ExecutableNotFound {
                name: self.executable_name().to_string(),
                searched: self.search_path().len(),
            })?;

        let command_line = self.build_arguments(test_library, tests);
        info!(
            executable = %executable.display(),
            arguments = %command_line,
            "running tests"
        );

        let status = Command::new(&executable)
            .args(self.arguments(test_library, tests).iter().map(Switch::to_arg))
            .status()
            .map_err(|source| RunnerError::Spawn {
                executable: executable.clone(),
                source,
            })?;

        let exit_code = status.code();
        let passed = exit_code.map_or(false, |code| self.interpret_exit_code(code));
        debug!(?exit_code, passed, "runner finished");

        Ok(TestRun {
            passed,
            exit_code,
            executable,
            command_line,
        })
    }
}
