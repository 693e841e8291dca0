//! Tortuga command-line front end
//!
//! The `tortuga` binary parses arguments and dispatches to [`commands`];
//! configuration discovery and styled output live here so they can be
//! exercised without spawning the binary.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::{Context, Outcome};
pub use config::{ConfigError, LoadedConfig, ResolverConfig, TortugaConfig};
pub use output::{ColorMode, StyledOutput};
