use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::WorkspaceError;

/// Ranges starting with this prefix are resolved by the workspace tool
/// itself and must never be rewritten.
pub const WORKSPACE_RANGE_PREFIX: &str = "workspace:";

/// Typed view over the fields of a `package.json` this tool cares
/// about. The raw document is kept separately as a `serde_json::Value`
/// so unknown fields survive a rewrite untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies", default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(rename = "peerDependencies", default)]
    pub peer_dependencies: BTreeMap<String, String>,
    pub workspaces: Option<WorkspacesField>,
}

/// npm accepts either a bare pattern array or `{ "packages": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WorkspacesField {
    Patterns(Vec<String>),
    Object { packages: Vec<String> },
}

impl WorkspacesField {
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::Patterns(patterns) => patterns,
            Self::Object { packages } => packages,
        }
    }
}

impl PackageManifest {
    /// # Errors
    ///
    /// Returns `WorkspaceError::ManifestRead` / `ManifestParse` on IO or
    /// JSON failures.
    pub fn from_file(path: &Path) -> Result<(Self, serde_json::Value), WorkspaceError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| WorkspaceError::ManifestRead {
                path: path.to_path_buf(),
                source,
            })?;

        let raw: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| WorkspaceError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        let manifest: Self =
            serde_json::from_value(raw.clone()).map_err(|source| WorkspaceError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok((manifest, raw))
    }

    /// Names of the given members this manifest depends on, in manifest
    /// order, from the regular and peer dependency maps.
    #[must_use]
    pub fn workspace_dependencies(&self, member_names: &[String]) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for name in self.dependencies.keys().chain(self.peer_dependencies.keys()) {
            if member_names.contains(name) && !deps.contains(name) {
                deps.push(name.clone());
            }
        }
        deps
    }

    #[must_use]
    pub fn workspace_dev_dependencies(&self, member_names: &[String]) -> Vec<String> {
        self.dev_dependencies
            .keys()
            .filter(|name| member_names.contains(name))
            .cloned()
            .collect()
    }
}
