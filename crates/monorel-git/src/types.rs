use std::path::PathBuf;

use monorel_commit::RawCommit;

/// A commit from the log plus the files it touched, the unit the
/// collection layer groups by package.
#[derive(Debug, Clone)]
pub struct LoggedCommit {
    pub raw: RawCommit,
    /// Paths relative to the repository root.
    pub changed_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
}
