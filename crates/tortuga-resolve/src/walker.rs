//! Depth-first traversal of a module's reference graph.
//!
//! The walk visits the root, then each reference in declared order, loading
//! referenced modules on demand. A visited set scoped to the walk keeps every
//! module from being loaded twice, which also makes cyclic graphs terminate.

use rustc_hash::FxHashSet;
use tortuga_meta::TypeDescriptor;
use tracing::trace;

use crate::error::ResolveError;
use crate::loader::{ModuleHost, ModuleLoader};
use crate::module::Module;

/// Early-exit policy of a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Stop at the first module whose matcher returns anything
    FirstMatch,
    /// Visit every reachable module and concatenate all matches
    Exhaustive,
}

/// Reference names already considered during one walk
///
/// Only grows. Insertion order is kept for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    names: FxHashSet<String>,
    order: Vec<String>,
}

impl VisitedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as visited; returns false if it already was
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    /// Whether `name` has been visited
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of visited names
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing has been visited
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Visited names in the order they were first seen
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Outcome of a completed walk
#[derive(Debug, Clone, Default)]
pub struct Walk {
    /// Matches, in traversal order
    pub matches: Vec<TypeDescriptor>,
    /// Reference names considered, root included
    pub visited: VisitedSet,
    /// Simple names of modules whose types were inspected, in order
    pub inspected: Vec<String>,
}

struct WalkState {
    visited: VisitedSet,
    matches: Vec<TypeDescriptor>,
    inspected: Vec<String>,
}

/// Traversal engine shared by the type and namespace lookups
pub struct GraphWalker<'h, H: ModuleHost + ?Sized> {
    loader: ModuleLoader<'h, H>,
}

impl<'h, H: ModuleHost + ?Sized> GraphWalker<'h, H> {
    /// Create a walker loading references through `host`
    pub fn new(host: &'h H) -> Self {
        Self {
            loader: ModuleLoader::new(host),
        }
    }

    /// Walk the graph reachable from `root`
    ///
    /// `matcher` is run once per visited module. With
    /// [`Traversal::FirstMatch`] the walk stops as soon as a matcher result
    /// is non-empty; with [`Traversal::Exhaustive`] every reachable module is
    /// visited and results are concatenated, current module first.
    ///
    /// The root's own name is marked visited up front, so references back to
    /// the root are never followed.
    ///
    /// The walk recurses once per level of reference depth, so stack use grows
    /// with the longest reference chain.
    pub fn walk<F>(
        &self,
        root: &dyn Module,
        traversal: Traversal,
        mut matcher: F,
    ) -> Result<Walk, ResolveError>
    where
        F: FnMut(&dyn Module) -> Vec<TypeDescriptor>,
    {
        let mut state = WalkState {
            visited: VisitedSet::new(),
            matches: Vec::new(),
            inspected: Vec::new(),
        };
        state.visited.insert(&root.identity().name);

        self.visit(root, traversal, &mut matcher, &mut state)?;

        Ok(Walk {
            matches: state.matches,
            visited: state.visited,
            inspected: state.inspected,
        })
    }

    /// Visit one module; returns true when the walk must stop
    fn visit<F>(
        &self,
        module: &dyn Module,
        traversal: Traversal,
        matcher: &mut F,
        state: &mut WalkState,
    ) -> Result<bool, ResolveError>
    where
        F: FnMut(&dyn Module) -> Vec<TypeDescriptor>,
    {
        let name = &module.identity().name;
        trace!(module = %name, "searching module");
        state.inspected.push(name.clone());

        let found = matcher(module);
        let matched = !found.is_empty();
        state.matches.extend(found);
        if matched && traversal == Traversal::FirstMatch {
            return Ok(true);
        }

        let hint_dir = module.directory();
        for reference in module.references() {
            if !state.visited.insert(&reference.name) {
                continue;
            }

            let loaded = self
                .loader
                .load(reference, hint_dir)
                .map_err(|source| ResolveError::Load {
                    referrer: name.clone(),
                    reference: reference.name.clone(),
                    source,
                })?;
            let Some(child) = loaded else {
                continue;
            };

            if self.visit(child.as_ref(), traversal, matcher, state)? {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
