//! In-memory host.
//!
//! Modules are registered up front and handed out as clones. Every load
//! request is recorded, which makes the host useful for embedding tools that
//! already hold module metadata and for asserting traversal order.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tortuga_meta::{ModuleIdentity, ModuleImage};

use crate::error::LoadError;
use crate::loader::{LoadOutcome, ModuleHost};

/// One load request received by a [`MemoryHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadAttempt {
    /// `load_by_full_name` with this identity string
    FullName(String),
    /// `load_by_identity` for this simple name
    Identity(String),
    /// `load_from_path` for this path
    Path(PathBuf),
}

/// Failure injected into a [`MemoryHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFailure {
    /// Answer with a conflicting load
    Conflict,
    /// Answer with an unexpected failure
    Malformed,
}

/// Host backed by registered module images
#[derive(Debug, Default)]
pub struct MemoryHost {
    /// Modules resolvable by identity
    installed: Vec<ModuleImage>,
    /// Modules resolvable by path
    placed: FxHashMap<PathBuf, ModuleImage>,
    /// Injected identity failures, by lower-case simple name
    identity_failures: FxHashMap<String, MemoryFailure>,
    /// Injected path failures
    path_failures: FxHashMap<PathBuf, MemoryFailure>,
    attempts: RefCell<Vec<LoadAttempt>>,
    loaded: RefCell<Vec<String>>,
}

impl MemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a module resolvable by identity (full name or structured)
    pub fn install(&mut self, image: ModuleImage) -> &mut Self {
        self.installed.push(image);
        self
    }

    /// Make a module resolvable by its location
    pub fn place(&mut self, image: ModuleImage) -> &mut Self {
        self.placed.insert(image.location().to_path_buf(), image);
        self
    }

    /// Make a module resolvable both ways
    pub fn add(&mut self, image: ModuleImage) -> &mut Self {
        self.place(image.clone());
        self.install(image)
    }

    /// Fail identity loads of `name`
    pub fn fail_identity(&mut self, name: &str, failure: MemoryFailure) -> &mut Self {
        self.identity_failures
            .insert(name.to_ascii_lowercase(), failure);
        self
    }

    /// Fail path loads of `path`
    pub fn fail_path(&mut self, path: impl Into<PathBuf>, failure: MemoryFailure) -> &mut Self {
        self.path_failures.insert(path.into(), failure);
        self
    }

    /// Every request received so far, in order
    pub fn attempts(&self) -> Vec<LoadAttempt> {
        self.attempts.borrow().clone()
    }

    /// Simple names of every module handed out, in order
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }

    /// How many times a module with this simple name was handed out
    pub fn load_count(&self, name: &str) -> usize {
        self.loaded.borrow().iter().filter(|n| *n == name).count()
    }

    /// Forget recorded requests
    pub fn clear_log(&self) {
        self.attempts.borrow_mut().clear();
        self.loaded.borrow_mut().clear();
    }

    fn hand_out(&self, image: &ModuleImage) -> LoadOutcome {
        self.loaded.borrow_mut().push(image.identity().name.clone());
        LoadOutcome::Loaded(Box::new(image.clone()))
    }

    fn identity_failure(&self, name: &str, request: &str) -> Option<LoadOutcome> {
        self.identity_failures
            .get(&name.to_ascii_lowercase())
            .map(|failure| failure_outcome(*failure, request))
    }
}

impl ModuleHost for MemoryHost {
    fn load_by_full_name(&self, full_name: &str) -> LoadOutcome {
        self.attempts
            .borrow_mut()
            .push(LoadAttempt::FullName(full_name.to_string()));

        let requested = match ModuleIdentity::parse(full_name) {
            Ok(identity) => identity,
            Err(e) => return LoadOutcome::Conflict(e.to_string()),
        };
        if let Some(outcome) = self.identity_failure(&requested.name, full_name) {
            return outcome;
        }

        match self
            .installed
            .iter()
            .find(|image| same_identity(image.identity(), &requested))
        {
            Some(image) => self.hand_out(image),
            None => LoadOutcome::NotFound,
        }
    }

    fn load_by_identity(&self, identity: &ModuleIdentity) -> LoadOutcome {
        self.attempts
            .borrow_mut()
            .push(LoadAttempt::Identity(identity.name.clone()));

        if let Some(outcome) = self.identity_failure(&identity.name, &identity.full_name()) {
            return outcome;
        }

        match self
            .installed
            .iter()
            .find(|image| image.identity().satisfies(identity))
        {
            Some(image) => self.hand_out(image),
            None => LoadOutcome::NotFound,
        }
    }

    fn load_from_path(&self, path: &Path) -> LoadOutcome {
        self.attempts
            .borrow_mut()
            .push(LoadAttempt::Path(path.to_path_buf()));

        if let Some(failure) = self.path_failures.get(path) {
            return failure_outcome(*failure, &path.display().to_string());
        }

        match self.placed.get(path) {
            Some(image) => self.hand_out(image),
            None => LoadOutcome::NotFound,
        }
    }
}

/// Exact identity equality, names compared case-insensitively
pub(crate) fn same_identity(actual: &ModuleIdentity, requested: &ModuleIdentity) -> bool {
    actual.name.eq_ignore_ascii_case(&requested.name)
        && actual.version == requested.version
        && actual.culture.as_deref().map(str::to_ascii_lowercase)
            == requested.culture.as_deref().map(str::to_ascii_lowercase)
        && actual.public_key_token == requested.public_key_token
}

fn failure_outcome(failure: MemoryFailure, request: &str) -> LoadOutcome {
    match failure {
        MemoryFailure::Conflict => {
            LoadOutcome::Conflict(format!("'{}' conflicts with a loaded module", request))
        }
        MemoryFailure::Malformed => LoadOutcome::Other(LoadError::Host {
            request: request.to_string(),
            message: "module metadata is malformed".to_string(),
        }),
    }
}
