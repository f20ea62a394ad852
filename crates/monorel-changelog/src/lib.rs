//! Changelog parsing, rendering and merging.
//!
//! Documents are treated structurally: version blocks are recognized by
//! a small set of heading dialects and carried verbatim unless a merge
//! targets them.

mod dialect;
mod error;
mod forge;
mod merge;
mod parse;
mod render;

use std::path::Path;

pub use dialect::{default_dialects, ChangelogDialect, ChangesetsDialect, ReleaseHeaderDialect};
pub use error::ChangelogError;
pub use forge::{Forge, RepositoryInfo};
pub use merge::merge;
pub use parse::{ParsedChangelog, VersionBlock};
pub use render::{render, ReleaseContext};

pub type Result<T> = std::result::Result<T, ChangelogError>;

pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

/// Reads a package changelog, `None` when the file does not exist yet.
///
/// # Errors
///
/// Returns `ChangelogError::Read` for IO failures other than a missing
/// file.
pub fn read_changelog(package_dir: &Path) -> Result<Option<String>> {
    let path = package_dir.join(CHANGELOG_FILE_NAME);
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ChangelogError::Read { path, source }),
    }
}

/// # Errors
///
/// Returns `ChangelogError::Write` if the file cannot be written.
pub fn write_changelog(package_dir: &Path, content: &str) -> Result<()> {
    let path = package_dir.join(CHANGELOG_FILE_NAME);
    std::fs::write(&path, content).map_err(|source| ChangelogError::Write { path, source })
}
