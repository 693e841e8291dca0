//! Module hosts
//!
//! A host turns load requests into loaded modules:
//! - [`ManifestHost`]: manifest files on disk plus probe directories
//! - [`MemoryHost`]: pre-registered images, with a request log

mod manifest;
mod memory;

pub use manifest::ManifestHost;
pub use memory::{LoadAttempt, MemoryFailure, MemoryHost};
