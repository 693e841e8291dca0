//! Configuration file parsing (tortuga.toml)
//!
//! ```toml
//! [resolver]
//! probe_dirs = ["/opt/modules"]
//!
//! [runner]
//! executable = "MSTest.exe"
//! search_dirs = ["tools/mstest"]
//! use_env_path = true
//! ```
//!
//! Relative directories are resolved against the directory holding the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tortuga_runner::RunnerConfig;

/// Name of the project-local configuration file
pub const CONFIG_FILE: &str = "tortuga.toml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed, but not usable
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// An explicitly requested config file does not exist
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TortugaConfig {
    /// Module resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Console test runner settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// `[resolver]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Directories searched for installed modules on identity loads
    pub probe_dirs: Vec<PathBuf>,
}

/// A configuration together with where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The configuration
    pub config: TortugaConfig,
    /// File it was read from; `None` for built-in defaults
    pub source: Option<PathBuf>,
}

impl TortugaConfig {
    /// Load configuration from a file, resolving relative paths against it
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: TortugaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let executable = &self.runner.executable;
        if executable.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "runner.executable cannot be empty".to_string(),
            ));
        }
        if executable.contains('/') || executable.contains('\\') {
            return Err(ConfigError::Invalid(format!(
                "runner.executable must be a file name, not a path: {}",
                executable
            )));
        }

        let empty = |dirs: &[PathBuf]| dirs.iter().any(|d| d.as_os_str().is_empty());
        if empty(&self.resolver.probe_dirs) {
            return Err(ConfigError::Invalid(
                "resolver.probe_dirs contains an empty path".to_string(),
            ));
        }
        if empty(&self.runner.search_dirs) {
            return Err(ConfigError::Invalid(
                "runner.search_dirs contains an empty path".to_string(),
            ));
        }

        Ok(())
    }

    fn resolve_relative(&mut self, base: &Path) {
        let resolve = |dirs: &mut Vec<PathBuf>| {
            for dir in dirs.iter_mut() {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        };
        resolve(&mut self.resolver.probe_dirs);
        resolve(&mut self.runner.search_dirs);
    }
}

/// Find and load the configuration in effect
///
/// Lookup order: `explicit`, then `./tortuga.toml`, then
/// `~/.tortuga/config.toml`. Defaults apply when none exists.
pub fn discover(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let cwd = std::env::current_dir()?;
    discover_in(explicit, &cwd, dirs::home_dir().as_deref())
}

/// [`discover`] with explicit working and home directories
pub fn discover_in(
    explicit: Option<&Path>,
    cwd: &Path,
    home: Option<&Path>,
) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return load(path);
    }

    let mut candidates = vec![cwd.join(CONFIG_FILE)];
    if let Some(home) = home {
        candidates.push(user_config_path(home));
    }

    match candidates.into_iter().find(|c| c.is_file()) {
        Some(path) => load(&path),
        None => Ok(LoadedConfig::default()),
    }
}

/// Per-user configuration file under `home`
pub fn user_config_path(home: &Path) -> PathBuf {
    home.join(".tortuga").join("config.toml")
}

fn load(path: &Path) -> Result<LoadedConfig, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config");
    Ok(LoadedConfig {
        config: TortugaConfig::from_file(path)?,
        source: Some(path.to_path_buf()),
    })
}
