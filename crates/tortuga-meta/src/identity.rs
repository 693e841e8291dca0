//! Module identities and references
//!
//! A module is identified by a structured identity: a simple name plus an
//! optional version, culture and public-key token. The textual form is
//! `Name, Version=1.2.0.0, Culture=en, PublicKeyToken=b77a5c561934e089`,
//! with absent parts omitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while parsing an identity string
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The identity string has no simple name
    #[error("Identity has an empty name: {0:?}")]
    EmptyName(String),

    /// A component is not of the form `Key=Value`
    #[error("Malformed identity component '{component}' in {identity:?}")]
    MalformedComponent {
        /// Full identity string being parsed
        identity: String,
        /// Offending component
        component: String,
    },

    /// The version is not 1 to 4 dot-separated numbers
    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    /// The public-key token is not an even-length hex string
    #[error("Invalid public key token '{0}'")]
    InvalidPublicKeyToken(String),

    /// The same component appears twice
    #[error("Duplicate identity component '{0}'")]
    DuplicateComponent(String),
}

/// Structured module identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleIdentity {
    /// Simple name, also used as the file stem on disk
    pub name: String,
    /// Dotted version (`1.2.0.0`)
    pub version: Option<String>,
    /// Culture, `None` for neutral modules
    pub culture: Option<String>,
    /// Lower-case hex public-key token
    pub public_key_token: Option<String>,
}

impl ModuleIdentity {
    /// Create an identity with only a simple name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            culture: None,
            public_key_token: None,
        }
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the culture
    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Set the public-key token
    pub fn with_public_key_token(mut self, token: impl Into<String>) -> Self {
        self.public_key_token = Some(token.into().to_ascii_lowercase());
        self
    }

    /// Parse a full identity string
    ///
    /// `Culture=neutral` and `PublicKeyToken=null` are read as absent.
    /// Unknown components are rejected so that typos do not silently widen
    /// a match.
    ///
    /// # Examples
    /// ```
    /// # use tortuga_meta::ModuleIdentity;
    /// let id = ModuleIdentity::parse("Acme.Core, Version=1.0.0.0, Culture=neutral").unwrap();
    /// assert_eq!(id.name, "Acme.Core");
    /// assert_eq!(id.version.as_deref(), Some("1.0.0.0"));
    /// assert_eq!(id.culture, None);
    /// ```
    pub fn parse(text: &str) -> Result<Self, IdentityError> {
        let mut parts = text.split(',');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName(text.to_string()));
        }

        let mut identity = ModuleIdentity::new(name);
        let mut seen_version = false;
        let mut seen_culture = false;
        let mut seen_token = false;

        for component in parts {
            let component = component.trim();
            let (key, value) = component.split_once('=').ok_or_else(|| {
                IdentityError::MalformedComponent {
                    identity: text.to_string(),
                    component: component.to_string(),
                }
            })?;
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("Version") {
                if std::mem::replace(&mut seen_version, true) {
                    return Err(IdentityError::DuplicateComponent(key.to_string()));
                }
                validate_version(value)?;
                identity.version = Some(value.to_string());
            } else if key.eq_ignore_ascii_case("Culture") {
                if std::mem::replace(&mut seen_culture, true) {
                    return Err(IdentityError::DuplicateComponent(key.to_string()));
                }
                if !value.eq_ignore_ascii_case("neutral") && !value.is_empty() {
                    identity.culture = Some(value.to_string());
                }
            } else if key.eq_ignore_ascii_case("PublicKeyToken") {
                if std::mem::replace(&mut seen_token, true) {
                    return Err(IdentityError::DuplicateComponent(key.to_string()));
                }
                if !value.eq_ignore_ascii_case("null") && !value.is_empty() {
                    validate_token(value)?;
                    identity.public_key_token = Some(value.to_ascii_lowercase());
                }
            } else {
                return Err(IdentityError::MalformedComponent {
                    identity: text.to_string(),
                    component: component.to_string(),
                });
            }
        }

        Ok(identity)
    }

    /// Render the full identity string
    pub fn full_name(&self) -> String {
        self.to_string()
    }

    /// Whether this identity satisfies a requested identity
    ///
    /// Names compare case-insensitively. Every component present in
    /// `requested` must be equal here; components the request leaves out
    /// match anything.
    pub fn satisfies(&self, requested: &ModuleIdentity) -> bool {
        if !self.name.eq_ignore_ascii_case(&requested.name) {
            return false;
        }
        if requested.version.is_some() && self.version != requested.version {
            return false;
        }
        if requested.culture.is_some()
            && !eq_ignore_case_opt(self.culture.as_deref(), requested.culture.as_deref())
        {
            return false;
        }
        if requested.public_key_token.is_some()
            && self.public_key_token != requested.public_key_token
        {
            return false;
        }
        true
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, ", Version={}", version)?;
        }
        if let Some(culture) = &self.culture {
            write!(f, ", Culture={}", culture)?;
        }
        if let Some(token) = &self.public_key_token {
            write!(f, ", PublicKeyToken={}", token)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ModuleIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ModuleIdentity::parse(&value)
    }
}

impl From<ModuleIdentity> for String {
    fn from(identity: ModuleIdentity) -> Self {
        identity.full_name()
    }
}

/// Unresolved pointer from one module to another
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    /// Simple name of the referenced module
    pub name: String,
    /// Full identity recorded by the referencing module, if any
    pub identity: Option<ModuleIdentity>,
}

impl ModuleRef {
    /// Reference a module by simple name only
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity: None,
        }
    }

    /// Reference a module by full identity
    pub fn with_identity(identity: ModuleIdentity) -> Self {
        Self {
            name: identity.name.clone(),
            identity: Some(identity),
        }
    }

    /// The full identity string, when the reference recorded one
    pub fn full_name(&self) -> Option<String> {
        self.identity.as_ref().map(ModuleIdentity::full_name)
    }

    /// The structured identity, falling back to a name-only identity
    pub fn structured_identity(&self) -> ModuleIdentity {
        self.identity
            .clone()
            .unwrap_or_else(|| ModuleIdentity::new(self.name.clone()))
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            Some(identity) => write!(f, "{}", identity),
            None => write!(f, "{}", self.name),
        }
    }
}

fn validate_version(value: &str) -> Result<(), IdentityError> {
    let parts: Vec<&str> = value.split('.').collect();
    let well_formed = (1..=4).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if well_formed {
        Ok(())
    } else {
        Err(IdentityError::InvalidVersion(value.to_string()))
    }
}

fn validate_token(value: &str) -> Result<(), IdentityError> {
    if value.len() % 2 == 0 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(IdentityError::InvalidPublicKeyToken(value.to_string()))
    }
}

fn eq_ignore_case_opt(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}
