//! Tortuga module metadata
//!
//! This crate provides the data model shared by the resolver and its hosts:
//! - Structured module identities and unresolved module references
//! - Type descriptors with their enclosing module
//! - The JSON module manifest format and in-memory module images

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod identity;
pub mod manifest;
pub mod types;

pub use identity::{IdentityError, ModuleIdentity, ModuleRef};
pub use manifest::{
    FormatError, ModuleBuilder, ModuleImage, ModuleManifest, ReferenceEntry, TypeEntry,
};
pub use types::{namespace_of, ModuleHeader, TypeDescriptor, TypeKind, NAMESPACE_SEPARATOR};
