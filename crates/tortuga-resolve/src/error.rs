//! Resolution error types.

use std::path::PathBuf;
use tortuga_meta::FormatError;

/// Unexpected failure while loading or inspecting one module.
///
/// "Not found" and "conflicting load" are not errors: hosts report them as
/// [`LoadOutcome`](crate::LoadOutcome) variants and the loader moves on to
/// its next strategy.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The module file exists but could not be read
    #[error("Failed to read module at {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The module file was read but its metadata is malformed
    #[error("Malformed module at {}: {source}", path.display())]
    Format {
        /// File that failed
        path: PathBuf,
        /// Underlying format error
        source: FormatError,
    },

    /// Any other host-specific failure
    #[error("Failed to load '{request}': {message}")]
    Host {
        /// What was being loaded
        request: String,
        /// Host-provided description
        message: String,
    },
}

/// Errors that abort a resolution call
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Loading a referenced module failed unexpectedly
    #[error("Failed to load '{reference}' referenced by '{referrer}': {source}")]
    Load {
        /// Module whose reference was being followed
        referrer: String,
        /// Name of the reference
        reference: String,
        /// Underlying load error
        source: LoadError,
    },

    /// The root module file does not exist
    #[error("Root module not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The root module could not be loaded
    #[error("Failed to load root module: {0}")]
    Root(#[source] LoadError),
}
