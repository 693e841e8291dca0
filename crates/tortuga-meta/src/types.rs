//! Type descriptors
//!
//! A [`TypeDescriptor`] is the identifying metadata for one declared type. It
//! owns a shared handle to its enclosing module's header so that it stays
//! valid after the module itself has been dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::identity::ModuleIdentity;

/// Namespace separator used in fully-qualified type names
pub const NAMESPACE_SEPARATOR: char = '.';

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Reference type with fields and methods
    #[default]
    Class,
    /// Interface
    Interface,
    /// Value type
    Struct,
    /// Enumeration
    Enum,
    /// Delegate
    Delegate,
}

impl TypeKind {
    /// Lower-case name, as written in manifests
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and physical location of a loaded module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleHeader {
    /// Structured identity
    pub identity: ModuleIdentity,
    /// Where the module was loaded from
    pub location: PathBuf,
}

impl ModuleHeader {
    /// Create a module header
    pub fn new(identity: ModuleIdentity, location: PathBuf) -> Self {
        Self { identity, location }
    }

    /// Directory containing the module, empty when the location has none
    pub fn directory(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Metadata for one declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Fully-qualified name (`Acme.Widgets.Button`)
    pub full_name: String,
    /// Namespace (`Acme.Widgets`); nested types share their declaring type's
    pub namespace: String,
    /// Kind of type
    pub kind: TypeKind,
    /// Declaring type, for nested types
    pub declaring_type: Option<String>,
    /// Enclosing module
    pub module: Arc<ModuleHeader>,
}

impl TypeDescriptor {
    /// Whether the type is a class
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// Whether the type is declared inside another type
    pub fn is_nested(&self) -> bool {
        self.declaring_type.is_some()
    }

    /// Location of the enclosing module
    pub fn module_location(&self) -> &Path {
        &self.module.location
    }

    /// Simple name of the enclosing module
    pub fn module_name(&self) -> &str {
        &self.module.identity.name
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.full_name, self.module.identity.name)
    }
}

/// Namespace part of a non-nested type's full name
///
/// Everything before the last separator; empty for types in the global
/// namespace.
pub fn namespace_of(full_name: &str) -> &str {
    full_name
        .rfind(NAMESPACE_SEPARATOR)
        .map(|pos| &full_name[..pos])
        .unwrap_or("")
}
