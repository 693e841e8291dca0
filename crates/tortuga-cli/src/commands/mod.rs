//! Subcommand implementations.

pub mod info;
pub mod namespace;
pub mod types;

use serde::Serialize;
use std::path::PathBuf;
use tortuga_meta::TypeDescriptor;
use tortuga_resolve::{ManifestHost, Resolver};

use crate::config::LoadedConfig;
use crate::output::StyledOutput;

/// How a command ended, mapped to the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything worked
    Success,
    /// The test run failed
    Failed,
    /// A lookup found nothing
    NotFound,
}

impl Outcome {
    /// Process exit status
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failed => 1,
            Outcome::NotFound => 2,
        }
    }
}

/// State shared by every command
pub struct Context {
    /// Configuration in effect
    pub config: LoadedConfig,
    /// Terminal writer
    pub out: StyledOutput,
    /// Print machine-readable JSON instead of styled text
    pub json: bool,
}

impl Context {
    /// Resolver over manifest files, probing the configured directories
    pub fn resolver(&self) -> Resolver<ManifestHost> {
        let probe_dirs = self.config.config.resolver.probe_dirs.clone();
        Resolver::new(ManifestHost::with_probe_dirs(probe_dirs))
    }
}

/// JSON shape of a resolved type
#[derive(Debug, Clone, Serialize)]
pub struct TypeReport {
    /// Fully-qualified name
    pub full_name: String,
    /// Namespace
    pub namespace: String,
    /// Kind, lower case
    pub kind: &'static str,
    /// Full identity of the declaring module
    pub module: String,
    /// Location of the declaring module
    pub location: PathBuf,
}

impl From<&TypeDescriptor> for TypeReport {
    fn from(ty: &TypeDescriptor) -> Self {
        Self {
            full_name: ty.full_name.clone(),
            namespace: ty.namespace.clone(),
            kind: ty.kind.as_str(),
            module: ty.module.identity.full_name(),
            location: ty.module_location().to_path_buf(),
        }
    }
}

/// Print one type as a styled line
fn print_type(out: &mut StyledOutput, ty: &TypeDescriptor) {
    out.bold(&ty.full_name);
    out.dim(&format!(" ({})", ty.kind));
    out.plain("  ");
    out.info(ty.module_name());
    out.dim(&format!("  {}", ty.module_location().display()));
    out.newline();
}
