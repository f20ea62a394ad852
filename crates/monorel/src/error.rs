use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("workspace error")]
    Workspace(#[from] monorel_workspace::WorkspaceError),

    #[error("git error")]
    Git(#[from] monorel_git::GitError),

    #[error("planning error")]
    Plan(#[from] monorel_plan::PlanError),

    #[error("changelog error")]
    Changelog(#[from] monorel_changelog::ChangelogError),

    #[error("manifest error")]
    Manifest(#[from] monorel_manifest::ManifestError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error")]
    Json(#[from] serde_json::Error),

    #[error("could not determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("no packages found in workspace at '{0}'")]
    EmptyWorkspace(PathBuf),

    #[error("malformed overrides file '{path}'")]
    OverridesParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CliError>;
