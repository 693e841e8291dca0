//! Tortuga cross-module type resolution
//!
//! Given a root module, this crate searches the transitive graph of modules it
//! references, loading each one on demand, for:
//! - a single type by exact fully-qualified name ([`TypeLookup`]), or
//! - every class under a namespace ([`NamespaceLookup`]).
//!
//! Modules come from a [`ModuleHost`]. [`ManifestHost`] reads module manifests
//! from disk; [`MemoryHost`] serves pre-registered images and records every
//! request it receives.
//!
//! ```ignore
//! let host = ManifestHost::with_probe_dirs(vec!["/opt/modules".into()]);
//! let resolver = Resolver::new(host);
//! let root = resolver.load_root(Path::new("bin/App.exe"))?;
//! let widget = resolver.resolve_type(root.as_ref(), "App.Widget")?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
pub mod host;
pub mod loader;
pub mod lookup;
mod module;
pub mod walker;

pub use error::{LoadError, ResolveError};
pub use host::{LoadAttempt, ManifestHost, MemoryFailure, MemoryHost};
pub use loader::{candidate_paths, LoadOutcome, ModuleHost, ModuleLoader, RESOLVING_EXTENSIONS};
pub use lookup::{NamespaceLookup, NamespacePrefix, TypeLookup};
pub use module::Module;
pub use walker::{GraphWalker, Traversal, VisitedSet, Walk};

use std::path::Path;
use tortuga_meta::TypeDescriptor;
use tracing::{debug, error};

/// Entry point tying a host to the two lookups
#[derive(Debug, Clone, Default)]
pub struct Resolver<H: ModuleHost> {
    host: H,
}

impl<H: ModuleHost> Resolver<H> {
    /// Create a resolver over `host`
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// The underlying host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Load the module a resolution starts from
    pub fn load_root(&self, path: &Path) -> Result<Box<dyn Module>, ResolveError> {
        match self.host.load_from_path(path) {
            LoadOutcome::Loaded(module) => Ok(module),
            LoadOutcome::NotFound => Err(ResolveError::RootNotFound(path.to_path_buf())),
            LoadOutcome::Conflict(message) => Err(ResolveError::Root(LoadError::Host {
                request: path.display().to_string(),
                message,
            })),
            LoadOutcome::Other(e) => Err(ResolveError::Root(e)),
        }
    }

    /// Find a type by exact fully-qualified name
    ///
    /// The root's own types are checked first; otherwise the first match in
    /// depth-first reference order is returned.
    pub fn resolve_type(
        &self,
        root: &dyn Module,
        full_name: &str,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        debug!(root = %root.identity().name, full_name, "resolving type");

        let found = TypeLookup::new(&self.host).find(root, full_name)?;
        if found.is_none() {
            error!(
                root = %root.identity().name,
                full_name,
                "type could not be found in the module or its references"
            );
        }
        Ok(found)
    }

    /// Find every class in `namespace` across the referenced modules
    ///
    /// The separator is appended to `namespace`, so only members of the
    /// namespace match. Types declared by the root itself are excluded.
    pub fn resolve_namespace_types(
        &self,
        root: &dyn Module,
        namespace: &str,
    ) -> Result<Vec<TypeDescriptor>, ResolveError> {
        let prefix = NamespacePrefix::namespace(namespace);
        self.find_namespace_types(root, &prefix, root.location())
    }

    /// Find every class under `prefix`, skipping types located at `exclude`
    pub fn find_namespace_types(
        &self,
        root: &dyn Module,
        prefix: &NamespacePrefix,
        exclude: &Path,
    ) -> Result<Vec<TypeDescriptor>, ResolveError> {
        debug!(
            root = %root.identity().name,
            %prefix,
            exclude = %exclude.display(),
            "resolving namespace types"
        );

        let found = NamespaceLookup::new(&self.host).find_all(root, prefix, exclude)?;
        if found.is_empty() {
            error!(
                root = %root.identity().name,
                %prefix,
                "no types found under namespace"
            );
        }
        Ok(found)
    }
}
