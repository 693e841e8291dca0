//! MSTest console runner.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{ConsoleTestRunner, Switch};

/// Default runner executable
pub const MSTEST_EXECUTABLE: &str = "MSTest.exe";

/// Visual Studio install directories holding the runner, newest first
const IDE_DIRS: [&str; 2] = [
    "Microsoft Visual Studio 11.0/Common7/IDE",
    "Microsoft Visual Studio 10.0/Common7/IDE",
];

/// Runner settings, as read from the `[runner]` config section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Executable file name
    pub executable: String,
    /// Extra directories searched after the Visual Studio ones
    pub search_dirs: Vec<PathBuf>,
    /// Also search every `PATH` entry
    pub use_env_path: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: MSTEST_EXECUTABLE.to_string(),
            search_dirs: Vec::new(),
            use_env_path: true,
        }
    }
}

/// Environment the search path is derived from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchEnvironment {
    /// Program-files roots (`ProgramFiles`, then `ProgramFiles(x86)`)
    pub program_files: Vec<PathBuf>,
    /// Raw `PATH` value
    pub path: Option<OsString>,
}

impl SearchEnvironment {
    /// Read the current process environment
    pub fn from_env() -> Self {
        let program_files = ["ProgramFiles", "ProgramFiles(x86)"]
            .iter()
            .filter_map(env::var_os)
            .filter(|root| !root.is_empty())
            .map(PathBuf::from)
            .collect();

        Self {
            program_files,
            path: env::var_os("PATH"),
        }
    }
}

/// Runs tests through `MSTest.exe`
///
/// The directory the executable is found in is remembered for the lifetime
/// of the runner; a failed search is retried on the next call.
#[derive(Debug)]
pub struct MsTestRunner {
    config: RunnerConfig,
    environment: SearchEnvironment,
    located: OnceCell<PathBuf>,
}

impl MsTestRunner {
    /// Create a runner searching the current process environment
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_environment(config, SearchEnvironment::from_env())
    }

    /// Create a runner searching an explicit environment
    pub fn with_environment(config: RunnerConfig, environment: SearchEnvironment) -> Self {
        Self {
            config,
            environment,
            located: OnceCell::new(),
        }
    }

    /// Runner settings
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Directory the executable was found in, once located
    pub fn located_dir(&self) -> Option<&Path> {
        self.located.get().map(PathBuf::as_path)
    }
}

impl Default for MsTestRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl ConsoleTestRunner for MsTestRunner {
    fn executable_name(&self) -> &str {
        &self.config.executable
    }

    fn search_path(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .environment
            .program_files
            .iter()
            .flat_map(|root| IDE_DIRS.iter().map(move |ide| root.join(ide)))
            .collect();

        dirs.extend(self.config.search_dirs.iter().cloned());

        if self.config.use_env_path {
            if let Some(path) = &self.environment.path {
                dirs.extend(env::split_paths(path).filter(|dir| !dir.as_os_str().is_empty()));
            }
        }

        dirs
    }

    fn arguments(&self, test_library: &Path, tests: &[String]) -> Vec<Switch> {
        let mut switches = Vec::with_capacity(tests.len() + 1);
        switches.push(Switch::new(
            "testcontainer",
            test_library.display().to_string(),
        ));
        switches.extend(tests.iter().map(|test| Switch::new("test", test.clone())));
        switches
    }

    fn locate_executable(&self) -> Option<PathBuf> {
        let name = self.executable_name();
        if let Some(dir) = self.located.get() {
            return Some(dir.join(name));
        }

        let search_path = self.search_path();
        match search_path.iter().find(|dir| dir.join(name).is_file()) {
            Some(dir) => {
                debug!(dir = %dir.display(), "located {}", name);
                let dir = self.located.get_or_init(|| dir.clone());
                Some(dir.join(name))
            }
            None => {
                warn!(searched = search_path.len(), "{} not found", name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn runner(config: RunnerConfig, environment: SearchEnvironment) -> MsTestRunner {
        MsTestRunner::with_environment(config, environment)
    }

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.executable, "MSTest.exe");
        assert!(config.search_dirs.is_empty());
        assert!(config.use_env_path);
    }

    #[test]
    fn test_search_path_order() {
        let path = env::join_paths([PathBuf::from("/usr/bin"), PathBuf::from("/opt/bin")]).unwrap();
        let environment = SearchEnvironment {
            program_files: vec![PathBuf::from("/pf"), PathBuf::from("/pf86")],
            path: Some(path),
        };
        let config = RunnerConfig {
            search_dirs: vec![PathBuf::from("/extra")],
            ..RunnerConfig::default()
        };

        let dirs = runner(config, environment).search_path();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/pf/Microsoft Visual Studio 11.0/Common7/IDE"),
                PathBuf::from("/pf/Microsoft Visual Studio 10.0/Common7/IDE"),
                PathBuf::from("/pf86/Microsoft Visual Studio 11.0/Common7/IDE"),
                PathBuf::from("/pf86/Microsoft Visual Studio 10.0/Common7/IDE"),
                PathBuf::from("/extra"),
                PathBuf::from("/usr/bin"),
                PathBuf::from("/opt/bin"),
            ]
        );
    }

    #[test]
    fn test_env_path_can_be_disabled() {
        let environment = SearchEnvironment {
            program_files: Vec::new(),
            path: Some(OsString::from("/usr/bin")),
        };
        let config = RunnerConfig {
            use_env_path: false,
            ..RunnerConfig::default()
        };
        assert!(runner(config, environment).search_path().is_empty());
    }

    #[test]
    fn test_arguments() {
        let runner = runner(RunnerConfig::default(), SearchEnvironment::default());
        let tests = vec![
            "Acme.Tests.AddsNumbers".to_string(),
            "Acme.Tests.SubtractsNumbers".to_string(),
        ];
        assert_eq!(
            runner.build_arguments(Path::new("bin/Acme.Tests.dll"), &tests),
            "/testcontainer:\"bin/Acme.Tests.dll\" /test:\"Acme.Tests.AddsNumbers\" /test:\"Acme.Tests.SubtractsNumbers\""
        );
    }

    #[test]
    fn test_locate_is_memoized() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join(MSTEST_EXECUTABLE), "").unwrap();

        let config = RunnerConfig {
            search_dirs: vec![first.path().to_path_buf(), second.path().to_path_buf()],
            use_env_path: false,
            ..RunnerConfig::default()
        };
        let runner = runner(config, SearchEnvironment::default());
        assert!(runner.located_dir().is_none());

        let located = runner.locate_executable().unwrap();
        assert_eq!(located, second.path().join(MSTEST_EXECUTABLE));
        assert_eq!(runner.located_dir(), Some(second.path()));

        // A runner placed earlier in the search path later on is not picked up.
        fs::write(first.path().join(MSTEST_EXECUTABLE), "").unwrap();
        assert_eq!(runner.locate_executable().unwrap(), located);
    }

    #[test]
    fn test_failed_search_is_retried() {
        let dir = TempDir::new().unwrap();
        let config = RunnerConfig {
            search_dirs: vec![dir.path().to_path_buf()],
            use_env_path: false,
            ..RunnerConfig::default()
        };
        let runner = runner(config, SearchEnvironment::default());
        assert!(runner.locate_executable().is_none());

        fs::write(dir.path().join(MSTEST_EXECUTABLE), "").unwrap();
        assert!(runner.locate_executable().is_some());
    }
}
