mod config;
mod error;
mod manifest;
mod workspace;

pub use config::{Config, GitConfig, GlobalAttribution, CONFIG_FILE_NAME, DEFAULT_OVERRIDES_FILE};
pub use error::WorkspaceError;
pub use manifest::{PackageManifest, WorkspacesField, WORKSPACE_RANGE_PREFIX};
pub use workspace::{discover_workspace, Package, Workspace};

pub type Result<T> = std::result::Result<T, WorkspaceError>;
