//! Applies a finished release plan to package manifests.
//!
//! Rewrites only begin after the whole plan exists; each write touches
//! one package's file, so they run in parallel.

mod error;
mod writer;

pub use error::ManifestError;
pub use writer::{render_manifest, updated_manifest, write_manifests};

pub type Result<T> = std::result::Result<T, ManifestError>;
