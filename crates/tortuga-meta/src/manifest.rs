//! Module manifests
//!
//! A manifest is the JSON description of one compiled module: its identity,
//! the types it declares and the modules it references.
//!
//! ```json
//! {
//!   "identity": "Acme.Widgets, Version=1.0.0.0",
//!   "types": [
//!     { "name": "Acme.Widgets.Button" },
//!     { "name": "Acme.Widgets.Button.Style", "kind": "enum", "declaring_type": "Acme.Widgets.Button" }
//!   ],
//!   "references": [
//!     { "name": "Acme.Core", "identity": "Acme.Core, Version=2.1.0.0" }
//!   ]
//! }
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::identity::{ModuleIdentity, ModuleRef};
use crate::types::{namespace_of, ModuleHeader, TypeDescriptor, TypeKind};

/// Errors that can occur while reading a manifest
#[derive(Debug, Error)]
pub enum FormatError {
    /// Failed to read the manifest file
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON
    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    /// Structurally valid JSON describing an impossible module
    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Module manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleManifest {
    /// Module identity
    pub identity: ModuleIdentity,

    /// Declared types, in declaration order
    #[serde(default)]
    pub types: Vec<TypeEntry>,

    /// Referenced modules, in declaration order
    #[serde(default)]
    pub references: Vec<ReferenceEntry>,
}

/// One declared type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeEntry {
    /// Fully-qualified name
    pub name: String,

    /// Kind (defaults to class)
    #[serde(default)]
    pub kind: TypeKind,

    /// Explicit namespace, derived from the name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Declaring type, for nested types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type: Option<String>,
}

/// One module reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceEntry {
    /// Simple name of the referenced module
    pub name: String,

    /// Full identity recorded at build time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<ModuleIdentity>,
}

impl ModuleManifest {
    /// Create an empty manifest
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            types: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Parse a manifest from a file
    pub fn from_file(path: &Path) -> Result<Self, FormatError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, FormatError> {
        let manifest: ModuleManifest = serde_json::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to a file
    pub fn write_to(&self, path: &Path) -> Result<(), FormatError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), FormatError> {
        let mut declared: FxHashMap<&str, &TypeEntry> = FxHashMap::default();
        for entry in &self.types {
            if entry.name.trim().is_empty() {
                return Err(FormatError::Invalid(format!(
                    "Module '{}' declares a type with an empty name",
                    self.identity.name
                )));
            }
            if declared.insert(entry.name.as_str(), entry).is_some() {
                return Err(FormatError::Invalid(format!(
                    "Module '{}' declares type '{}' twice",
                    self.identity.name, entry.name
                )));
            }
        }

        for entry in &self.types {
            if let Some(declaring) = &entry.declaring_type {
                if declaring == &entry.name {
                    return Err(FormatError::Invalid(format!(
                        "Type '{}' cannot be nested in itself",
                        entry.name
                    )));
                }
                if !declared.contains_key(declaring.as_str()) {
                    return Err(FormatError::Invalid(format!(
                        "Nested type '{}' names undeclared declaring type '{}'",
                        entry.name, declaring
                    )));
                }
            }
        }

        // Declaring chains must end at a top-level type.
        for entry in &self.types {
            let mut current = entry;
            let mut steps = 0;
            while let Some(declaring) = &current.declaring_type {
                steps += 1;
                if steps > self.types.len() {
                    return Err(FormatError::Invalid(format!(
                        "Declaring types of '{}' form a cycle",
                        entry.name
                    )));
                }
                current = declared[declaring.as_str()];
            }
        }

        for reference in &self.references {
            if reference.name.trim().is_empty() {
                return Err(FormatError::Invalid(format!(
                    "Module '{}' has a reference with an empty name",
                    self.identity.name
                )));
            }
            if let Some(identity) = &reference.identity {
                if !identity.name.eq_ignore_ascii_case(&reference.name) {
                    return Err(FormatError::Invalid(format!(
                        "Reference '{}' carries identity of '{}'",
                        reference.name, identity.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Namespace of a declared type, following declaring types for nested ones
    fn namespace_for(&self, entry: &TypeEntry) -> String {
        if let Some(namespace) = &entry.namespace {
            return namespace.clone();
        }
        match &entry.declaring_type {
            Some(declaring) => self
                .types
                .iter()
                .find(|t| &t.name == declaring)
                .map(|outer| self.namespace_for(outer))
                .unwrap_or_default(),
            None => namespace_of(&entry.name).to_string(),
        }
    }
}

/// A module materialized from a manifest
///
/// Holds everything a resolver needs: the header (identity and location),
/// the declared types and the ordered reference list.
#[derive(Debug, Clone)]
pub struct ModuleImage {
    header: Arc<ModuleHeader>,
    types: Vec<TypeDescriptor>,
    references: Vec<ModuleRef>,
}

impl ModuleImage {
    /// Build a module image from a validated manifest
    pub fn from_manifest(manifest: ModuleManifest, location: PathBuf) -> Result<Self, FormatError> {
        manifest.validate()?;
        let header = Arc::new(ModuleHeader::new(manifest.identity.clone(), location));

        let types = manifest
            .types
            .iter()
            .map(|entry| TypeDescriptor {
                full_name: entry.name.clone(),
                namespace: manifest.namespace_for(entry),
                kind: entry.kind,
                declaring_type: entry.declaring_type.clone(),
                module: header.clone(),
            })
            .collect();

        let references = manifest
            .references
            .into_iter()
            .map(|r| ModuleRef {
                name: r.name,
                identity: r.identity,
            })
            .collect();

        Ok(Self {
            header,
            types,
            references,
        })
    }

    /// Read a manifest file and build its image, located at `path`
    pub fn from_file(path: &Path) -> Result<Self, FormatError> {
        let manifest = ModuleManifest::from_file(path)?;
        Self::from_manifest(manifest, path.to_path_buf())
    }

    /// Shared header
    pub fn header(&self) -> &Arc<ModuleHeader> {
        &self.header
    }

    /// Module identity
    pub fn identity(&self) -> &ModuleIdentity {
        &self.header.identity
    }

    /// Physical location
    pub fn location(&self) -> &Path {
        &self.header.location
    }

    /// Declared types
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Referenced modules
    pub fn references(&self) -> &[ModuleRef] {
        &self.references
    }
}

/// Helper for building module manifests in code
pub struct ModuleBuilder {
    manifest: ModuleManifest,
}

impl ModuleBuilder {
    /// Start a manifest for `identity`
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            manifest: ModuleManifest::new(identity),
        }
    }

    /// Declare a top-level type
    pub fn add_type(&mut self, name: impl Into<String>, kind: TypeKind) -> &mut Self {
        self.manifest.types.push(TypeEntry {
            name: name.into(),
            kind,
            namespace: None,
            declaring_type: None,
        });
        self
    }

    /// Declare a top-level class
    pub fn add_class(&mut self, name: impl Into<String>) -> &mut Self {
        self.add_type(name, TypeKind::Class)
    }

    /// Declare a type nested in `declaring_type`
    pub fn add_nested(
        &mut self,
        name: impl Into<String>,
        kind: TypeKind,
        declaring_type: impl Into<String>,
    ) -> &mut Self {
        self.manifest.types.push(TypeEntry {
            name: name.into(),
            kind,
            namespace: None,
            declaring_type: Some(declaring_type.into()),
        });
        self
    }

    /// Reference a module by simple name
    pub fn add_reference(&mut self, name: impl Into<String>) -> &mut Self {
        self.manifest.references.push(ReferenceEntry {
            name: name.into(),
            identity: None,
        });
        self
    }

    /// Reference a module by full identity
    pub fn add_reference_identity(&mut self, identity: ModuleIdentity) -> &mut Self {
        self.manifest.references.push(ReferenceEntry {
            name: identity.name.clone(),
            identity: Some(identity),
        });
        self
    }

    /// The manifest built so far
    pub fn manifest(&self) -> &ModuleManifest {
        &self.manifest
    }

    /// Finish and return the manifest
    pub fn into_manifest(self) -> ModuleManifest {
        self.manifest
    }

    /// Build the module image, located at `location`
    pub fn build(self, location: impl Into<PathBuf>) -> Result<ModuleImage, FormatError> {
        ModuleImage::from_manifest(self.manifest, location.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: &str = r#"{
        "identity": "Acme.Widgets, Version=1.0.0.0",
        "types": [
            { "name": "Acme.Widgets.Button" },
            { "name": "Acme.Widgets.Button.Style", "kind": "enum", "declaring_type": "Acme.Widgets.Button" },
            { "name": "Acme.Widgets.IClickable", "kind": "interface" },
            { "name": "Legacy", "namespace": "Acme.Compat" }
        ],
        "references": [
            { "name": "Acme.Core", "identity": "Acme.Core, Version=2.1.0.0" },
            { "name": "System.Runtime" }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = ModuleManifest::from_str(WIDGETS).unwrap();
        assert_eq!(manifest.identity.name, "Acme.Widgets");
        assert_eq!(manifest.types.len(), 4);
        assert_eq!(manifest.types[0].kind, TypeKind::Class);
        assert_eq!(manifest.types[2].kind, TypeKind::Interface);
        assert_eq!(manifest.references.len(), 2);
        assert_eq!(
            manifest.references[0].identity.as_ref().unwrap().version.as_deref(),
            Some("2.1.0.0")
        );
    }

    #[test]
    fn test_image_descriptors() {
        let manifest = ModuleManifest::from_str(WIDGETS).unwrap();
        let image = ModuleImage::from_manifest(manifest, PathBuf::from("/lib/Acme.Widgets.dll"))
            .unwrap();

        let button = &image.types()[0];
        assert_eq!(button.namespace, "Acme.Widgets");
        assert!(button.is_class());
        assert!(!button.is_nested());
        assert_eq!(button.module_location(), Path::new("/lib/Acme.Widgets.dll"));

        let style = &image.types()[1];
        assert!(style.is_nested());
        assert_eq!(style.namespace, "Acme.Widgets");

        assert_eq!(image.types()[3].namespace, "Acme.Compat");
        assert_eq!(image.references()[0].name, "Acme.Core");
        assert_eq!(
            image.references()[0].full_name().as_deref(),
            Some("Acme.Core, Version=2.1.0.0")
        );
        assert_eq!(image.references()[1].full_name(), None);
    }

    #[test]
    fn test_invalid_identity_is_parse_error() {
        let result = ModuleManifest::from_str(r#"{ "identity": "Acme, Version=one" }"#);
        assert!(matches!(result, Err(FormatError::Parse(_))));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let result = ModuleManifest::from_str(
            r#"{ "identity": "Acme", "types": [ { "name": "A.B" }, { "name": "A.B" } ] }"#,
        );
        assert!(matches!(result, Err(FormatError::Invalid(_))));
    }

    #[test]
    fn test_undeclared_declaring_type_rejected() {
        let result = ModuleManifest::from_str(
            r#"{ "identity": "Acme", "types": [ { "name": "A.B.C", "declaring_type": "A.B" } ] }"#,
        );
        assert!(matches!(result, Err(FormatError::Invalid(_))));
    }

    #[test]
    fn test_declaring_cycle_rejected() {
        let result = ModuleManifest::from_str(
            r#"{ "identity": "Acme", "types": [
                { "name": "A.X", "declaring_type": "A.Y" },
                { "name": "A.Y", "declaring_type": "A.X" }
            ] }"#,
        );
        assert!(matches!(result, Err(FormatError::Invalid(_))));
    }

    #[test]
    fn test_reference_identity_must_match_name() {
        let result = ModuleManifest::from_str(
            r#"{ "identity": "Acme", "references": [ { "name": "A", "identity": "B, Version=1.0" } ] }"#,
        );
        assert!(matches!(result, Err(FormatError::Invalid(_))));
    }

    #[test]
    fn test_builder_round_trips_through_json() {
        let mut builder = ModuleBuilder::new(ModuleIdentity::new("App"));
        builder
            .add_class("App.Widget")
            .add_nested("App.Widget.Gadget", TypeKind::Class, "App.Widget")
            .add_reference("Lib");

        let json = builder.manifest().to_json().unwrap();
        let reparsed = ModuleManifest::from_str(&json).unwrap();
        assert_eq!(&reparsed, builder.manifest());

        let image = builder.build("/app/App.exe").unwrap();
        assert_eq!(image.identity().name, "App");
        assert_eq!(image.types()[1].declaring_type.as_deref(), Some("App.Widget"));
    }
}
