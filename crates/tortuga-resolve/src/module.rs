//! The module capability seen by the resolver.

use std::fmt;
use std::path::Path;
use tortuga_meta::{ModuleIdentity, ModuleImage, ModuleRef, TypeDescriptor};

/// A loaded compiled unit
///
/// Hosts hand out modules as `Box<dyn Module>`; the resolver only asks them
/// for their identity, location, declared types and references. A module
/// lives for at most one resolution call.
pub trait Module: fmt::Debug {
    /// Structured identity
    fn identity(&self) -> &ModuleIdentity;

    /// Physical location the module was loaded from
    fn location(&self) -> &Path;

    /// Declared types, nested types included
    fn declared_types(&self) -> &[TypeDescriptor];

    /// Referenced modules, in declaration order
    fn references(&self) -> &[ModuleRef];

    /// Directory used as the hint for file-based loads of references
    fn directory(&self) -> &Path;
}

impl Module for ModuleImage {
    fn identity(&self) -> &ModuleIdentity {
        ModuleImage::identity(self)
    }

    fn location(&self) -> &Path {
        ModuleImage::location(self)
    }

    fn declared_types(&self) -> &[TypeDescriptor] {
        self.types()
    }

    fn references(&self) -> &[ModuleRef] {
        ModuleImage::references(self)
    }

    fn directory(&self) -> &Path {
        self.header().directory()
    }
}
