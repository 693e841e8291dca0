//! Type and namespace lookups over the reference graph.

use std::fmt;
use std::path::Path;
use tortuga_meta::{TypeDescriptor, NAMESPACE_SEPARATOR};
use tracing::trace;

use crate::error::ResolveError;
use crate::loader::ModuleHost;
use crate::module::Module;
use crate::walker::{GraphWalker, Traversal};

// ── Type lookup ──

/// Finds one type by exact fully-qualified name
///
/// The first match in depth-first order wins; the root's own types are
/// checked before any reference is loaded.
pub struct TypeLookup<'h, H: ModuleHost + ?Sized> {
    walker: GraphWalker<'h, H>,
}

impl<'h, H: ModuleHost + ?Sized> TypeLookup<'h, H> {
    /// Create a lookup loading references through `host`
    pub fn new(host: &'h H) -> Self {
        Self {
            walker: GraphWalker::new(host),
        }
    }

    /// Find the type named `full_name` reachable from `root`
    ///
    /// # Returns
    /// * `Ok(Some(ty))` - First declared type with that exact name
    /// * `Ok(None)` - No reachable module declares it
    /// * `Err(ResolveError)` - A reference failed to load unexpectedly
    pub fn find(
        &self,
        root: &dyn Module,
        full_name: &str,
    ) -> Result<Option<TypeDescriptor>, ResolveError> {
        let walk = self
            .walker
            .walk(root, Traversal::FirstMatch, |module| {
                module
                    .declared_types()
                    .iter()
                    .filter(|ty| ty.full_name == full_name)
                    .take(1)
                    .inspect(|ty| trace!(matched = %ty, "type matched"))
                    .cloned()
                    .collect()
            })?;

        Ok(walk.matches.into_iter().next())
    }
}

// ── Namespace lookup ──

/// Namespace prefix with separator-boundary matching
///
/// A prefix ending in `.` matches names that start with it. A prefix without
/// a trailing separator matches the name itself or names continuing it after
/// a `.`. The empty prefix matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacePrefix(String);

impl NamespacePrefix {
    /// Use `prefix` as given
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Prefix selecting the members of `namespace`
    ///
    /// The separator is always appended, so `""` becomes `"."` and
    /// `"Acme."` becomes `"Acme.."`. Neither matches any well-formed name.
    pub fn namespace(namespace: &str) -> Self {
        Self(format!("{}{}", namespace, NAMESPACE_SEPARATOR))
    }

    /// Whether `full_name` falls under this prefix
    pub fn matches(&self, full_name: &str) -> bool {
        let prefix = self.0.as_str();
        if prefix.is_empty() || prefix.ends_with(NAMESPACE_SEPARATOR) {
            return full_name.starts_with(prefix);
        }
        match full_name.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(NAMESPACE_SEPARATOR),
            None => false,
        }
    }

    /// Raw prefix text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespacePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collects every class under a namespace prefix across the graph
///
/// Only non-nested classes are returned, and types whose module lives at the
/// excluded location are skipped. Duplicates across modules are kept.
pub struct NamespaceLookup<'h, H: ModuleHost + ?Sized> {
    walker: GraphWalker<'h, H>,
}

impl<'h, H: ModuleHost + ?Sized> NamespaceLookup<'h, H> {
    /// Create a lookup loading references through `host`
    pub fn new(host: &'h H) -> Self {
        Self {
            walker: GraphWalker::new(host),
        }
    }

    /// Find all matching types reachable from `root`, in traversal order
    ///
    /// # Arguments
    /// * `root` - Module the walk starts from
    /// * `prefix` - Namespace prefix full names must match
    /// * `exclude_location` - Module location whose types are skipped
    pub fn find_all(
        &self,
        root: &dyn Module,
        prefix: &NamespacePrefix,
        exclude_location: &Path,
    ) -> Result<Vec<TypeDescriptor>, ResolveError> {
        let walk = self.walker.walk(root, Traversal::Exhaustive, |module| {
            module
                .declared_types()
                .iter()
                .filter(|ty| {
                    ty.is_class()
                        && !ty.is_nested()
                        && prefix.matches(&ty.full_name)
                        && ty.module_location() != exclude_location
                })
                .inspect(|ty| trace!(matched = %ty, "type matched"))
                .cloned()
                .collect()
        })?;

        Ok(walk.matches)
    }
}
