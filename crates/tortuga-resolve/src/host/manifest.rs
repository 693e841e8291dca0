//! File-system host reading module manifests.
//!
//! Identity loads search the configured probe directories (the places where
//! shared modules are installed) for `<name>.dll` / `<name>.exe`. Path loads
//! read exactly the file they are given.

use std::path::{Path, PathBuf};
use tortuga_meta::{FormatError, ModuleIdentity, ModuleImage};
use tracing::trace;

use crate::error::LoadError;
use crate::host::memory::same_identity;
use crate::loader::{candidate_paths, LoadOutcome, ModuleHost};

/// Host that loads manifest files from disk
#[derive(Debug, Clone, Default)]
pub struct ManifestHost {
    probe_dirs: Vec<PathBuf>,
}

impl ManifestHost {
    /// Create a host with no probe directories (path loads only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host searching `probe_dirs` for identity loads
    pub fn with_probe_dirs(probe_dirs: Vec<PathBuf>) -> Self {
        Self { probe_dirs }
    }

    /// Add a probe directory
    pub fn add_probe_dir(&mut self, dir: impl Into<PathBuf>) {
        self.probe_dirs.push(dir.into());
    }

    /// Configured probe directories
    pub fn probe_dirs(&self) -> &[PathBuf] {
        &self.probe_dirs
    }

    /// Probe for an installed module whose identity passes `accept`
    fn probe<F>(&self, requested: &ModuleIdentity, accept: F) -> LoadOutcome
    where
        F: Fn(&ModuleIdentity) -> bool,
    {
        let mut conflict = None;

        for dir in &self.probe_dirs {
            for candidate in candidate_paths(&dir.join(&requested.name)) {
                match read_image(&candidate) {
                    Ok(Some(image)) => {
                        if accept(image.identity()) {
                            return LoadOutcome::Loaded(Box::new(image));
                        }
                        trace!(
                            path = %candidate.display(),
                            found = %image.identity(),
                            requested = %requested,
                            "installed module has a different identity"
                        );
                        conflict.get_or_insert_with(|| {
                            format!(
                                "{} holds '{}', requested '{}'",
                                candidate.display(),
                                image.identity(),
                                requested
                            )
                        });
                    }
                    Ok(None) => {}
                    Err(e) => return LoadOutcome::Other(e),
                }
            }
        }

        match conflict {
            Some(reason) => LoadOutcome::Conflict(reason),
            None => LoadOutcome::NotFound,
        }
    }
}

impl ModuleHost for ManifestHost {
    fn load_by_full_name(&self, full_name: &str) -> LoadOutcome {
        let requested = match ModuleIdentity::parse(full_name) {
            Ok(identity) => identity,
            Err(e) => return LoadOutcome::Conflict(e.to_string()),
        };
        self.probe(&requested, |found| same_identity(found, &requested))
    }

    fn load_by_identity(&self, identity: &ModuleIdentity) -> LoadOutcome {
        self.probe(identity, |found| found.satisfies(identity))
    }

    fn load_from_path(&self, path: &Path) -> LoadOutcome {
        match read_image(path) {
            Ok(Some(image)) => LoadOutcome::Loaded(Box::new(image)),
            Ok(None) => LoadOutcome::NotFound,
            Err(e) => LoadOutcome::Other(e),
        }
    }
}

/// Read the manifest at `path`; `Ok(None)` when there is no such file
fn read_image(path: &Path) -> Result<Option<ModuleImage>, LoadError> {
    if !path.is_file() {
        return Ok(None);
    }
    match ModuleImage::from_file(path) {
        Ok(image) => Ok(Some(image)),
        Err(FormatError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(FormatError::Io(source)) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
        Err(source) => Err(LoadError::Format {
            path: path.to_path_buf(),
            source,
        }),
    }
}
