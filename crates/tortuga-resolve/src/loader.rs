//! Module loading with layered fallback.
//!
//! A reference is resolved by trying, in order:
//! 1. the host's load by full identity string,
//! 2. the host's load by structured identity,
//! 3. a file load of `<hint dir>/<simple name><ext>` for each extension in
//!    [`RESOLVING_EXTENSIONS`].
//!
//! The first module that loads wins. "Not found" and "conflicting load"
//! move on to the next attempt; any other failure is returned to the caller.

use std::path::{Path, PathBuf};
use tortuga_meta::{ModuleIdentity, ModuleRef};
use tracing::trace;

use crate::error::LoadError;
use crate::module::Module;

/// File extensions probed for file-based loads, in priority order
pub const RESOLVING_EXTENSIONS: [&str; 2] = [".dll", ".exe"];

/// Result of one host load attempt
#[derive(Debug)]
pub enum LoadOutcome {
    /// The module loaded
    Loaded(Box<dyn Module>),
    /// Nothing answers to the request
    NotFound,
    /// Something answered but does not fit the request (wrong identity,
    /// unusable image); the message is for diagnostics only
    Conflict(String),
    /// Unexpected failure
    Other(LoadError),
}

/// Environment capable of producing loaded modules
///
/// Each method is one independent strategy; the [`ModuleLoader`] decides the
/// order they are tried in.
pub trait ModuleHost {
    /// Load by full identity string (`Name, Version=…`)
    fn load_by_full_name(&self, full_name: &str) -> LoadOutcome;

    /// Load by structured identity
    fn load_by_identity(&self, identity: &ModuleIdentity) -> LoadOutcome;

    /// Load the module file at `path`
    fn load_from_path(&self, path: &Path) -> LoadOutcome;
}

impl<H: ModuleHost + ?Sized> ModuleHost for &H {
    fn load_by_full_name(&self, full_name: &str) -> LoadOutcome {
        (**self).load_by_full_name(full_name)
    }

    fn load_by_identity(&self, identity: &ModuleIdentity) -> LoadOutcome {
        (**self).load_by_identity(identity)
    }

    fn load_from_path(&self, path: &Path) -> LoadOutcome {
        (**self).load_from_path(path)
    }
}

/// Resolves module references through a host
pub struct ModuleLoader<'h, H: ModuleHost + ?Sized> {
    host: &'h H,
}

impl<'h, H: ModuleHost + ?Sized> ModuleLoader<'h, H> {
    /// Create a loader over `host`
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Load the module a reference points to
    ///
    /// # Arguments
    /// * `reference` - Reference to resolve
    /// * `hint_dir` - Directory of the referencing module, used for file loads
    ///
    /// # Returns
    /// * `Ok(Some(module))` - First strategy that produced a module
    /// * `Ok(None)` - Every strategy reported not-found or conflict
    /// * `Err(LoadError)` - A strategy failed unexpectedly
    pub fn load(
        &self,
        reference: &ModuleRef,
        hint_dir: &Path,
    ) -> Result<Option<Box<dyn Module>>, LoadError> {
        if let Some(full_name) = reference.full_name() {
            let outcome = self.host.load_by_full_name(&full_name);
            if let Some(module) = settle(outcome, "full name", &reference.name)? {
                return Ok(Some(module));
            }
        }

        let identity = reference.structured_identity();
        let outcome = self.host.load_by_identity(&identity);
        if let Some(module) = settle(outcome, "identity", &reference.name)? {
            return Ok(Some(module));
        }

        let stem = hint_dir.join(&reference.name);
        for candidate in candidate_paths(&stem) {
            let outcome = self.host.load_from_path(&candidate);
            if let Some(module) = settle(outcome, "path", &reference.name)? {
                return Ok(Some(module));
            }
        }

        trace!(reference = %reference.name, "reference could not be loaded");
        Ok(None)
    }
}

/// Candidate files for a path stem, in probing order
///
/// The extension is appended to the full stem, so dotted module names keep
/// every segment: `lib/Acme.Core` → `lib/Acme.Core.dll`, `lib/Acme.Core.exe`.
pub fn candidate_paths(stem: &Path) -> Vec<PathBuf> {
    RESOLVING_EXTENSIONS
        .iter()
        .map(|ext| {
            let mut path = stem.as_os_str().to_os_string();
            path.push(ext);
            PathBuf::from(path)
        })
        .collect()
}

fn settle(
    outcome: LoadOutcome,
    strategy: &str,
    reference: &str,
) -> Result<Option<Box<dyn Module>>, LoadError> {
    match outcome {
        LoadOutcome::Loaded(module) => {
            trace!(
                reference,
                strategy,
                location = %module.location().display(),
                "loaded referenced module"
            );
            Ok(Some(module))
        }
        LoadOutcome::NotFound => {
            trace!(reference, strategy, "not found");
            Ok(None)
        }
        LoadOutcome::Conflict(reason) => {
            trace!(reference, strategy, %reason, "conflicting load");
            Ok(None)
        }
        LoadOutcome::Other(error) => Err(error),
    }
}
