use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use semver::Version;

use crate::error::WorkspaceError;
use crate::manifest::{PackageManifest, WorkspacesField};

/// A workspace member, read once per run from its manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub path: PathBuf,
    /// The full parsed manifest document, preserved for rewriting.
    pub manifest: serde_json::Value,
    pub workspace_dependencies: Vec<String>,
    pub workspace_dev_dependencies: Vec<String>,
}

impl Package {
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join("package.json")
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub packages: Vec<Package>,
}

impl Workspace {
    /// The package (if any) whose directory contains `file`, preferring
    /// the deepest match so nested packages win over their parents.
    #[must_use]
    pub fn package_for_file(&self, file: &Path) -> Option<&Package> {
        self.packages
            .iter()
            .filter(|pkg| {
                let rel = pkg.path.strip_prefix(&self.root).unwrap_or(&pkg.path);
                rel.as_os_str().is_empty() || file.starts_with(rel)
            })
            .max_by_key(|pkg| pkg.path.components().count())
    }
}

/// Walks up from `start_dir` to the first `package.json` declaring
/// `workspaces`, then reads every member manifest the patterns match.
///
/// # Errors
///
/// Returns `WorkspaceError::NotFound` when no workspace root exists,
/// and manifest read/parse errors for malformed members (structural
/// problems are fatal for the whole run).
pub fn discover_workspace(start_dir: &Path) -> Result<Workspace, WorkspaceError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| WorkspaceError::ManifestRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let (root, root_manifest, root_raw) = find_workspace_root(&start_dir)?;
    let packages = collect_packages(&root, &root_manifest, root_raw)?;

    Ok(Workspace { root, packages })
}

fn find_workspace_root(
    start_dir: &Path,
) -> Result<(PathBuf, PackageManifest, serde_json::Value), WorkspaceError> {
    let mut current = start_dir.to_path_buf();

    loop {
        let manifest_path = current.join("package.json");

        if manifest_path.exists() {
            let (manifest, raw) = PackageManifest::from_file(&manifest_path)?;
            if manifest.workspaces.is_some() {
                return Ok((current, manifest, raw));
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return Err(WorkspaceError::NotFound {
                    start_dir: start_dir.to_path_buf(),
                });
            }
        }
    }
}

fn collect_packages(
    root: &Path,
    root_manifest: &PackageManifest,
    _root_raw: serde_json::Value,
) -> Result<Vec<Package>, WorkspaceError> {
    let patterns = root_manifest
        .workspaces
        .as_ref()
        .map(WorkspacesField::patterns)
        .unwrap_or_default();

    let mut member_dirs = Vec::new();
    for pattern in patterns {
        member_dirs.extend(expand_glob_pattern(root, pattern)?);
    }
    member_dirs.sort();
    member_dirs.dedup();

    // First pass: read manifests so workspace-internal edges can be
    // resolved against the full member name set.
    let mut entries = Vec::new();
    for dir in member_dirs {
        let manifest_path = dir.join("package.json");
        if !manifest_path.exists() {
            continue;
        }

        let (manifest, raw) = PackageManifest::from_file(&manifest_path)?;

        let name = manifest
            .name
            .clone()
            .ok_or_else(|| WorkspaceError::MissingField {
                path: manifest_path.clone(),
                field: "name",
            })?;
        let version_str =
            manifest
                .version
                .clone()
                .ok_or_else(|| WorkspaceError::MissingField {
                    path: manifest_path.clone(),
                    field: "version",
                })?;
        let version =
            version_str
                .parse()
                .map_err(|source| WorkspaceError::InvalidVersion {
                    path: manifest_path.clone(),
                    version: version_str,
                    source,
                })?;

        entries.push((name, version, dir, manifest, raw));
    }

    let member_names: Vec<String> = entries.iter().map(|(name, ..)| name.clone()).collect();

    let mut packages: Vec<Package> = entries
        .into_iter()
        .map(|(name, version, dir, manifest, raw)| Package {
            workspace_dependencies: manifest.workspace_dependencies(&member_names),
            workspace_dev_dependencies: manifest.workspace_dev_dependencies(&member_names),
            name,
            version,
            path: dir,
            manifest: raw,
        })
        .collect();

    packages.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(packages)
}

fn expand_glob_pattern(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, WorkspaceError> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| WorkspaceError::GlobPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let mut dirs = Vec::new();
    collect_matching_dirs(root, root, &glob, &mut dirs)?;
    Ok(dirs)
}

fn collect_matching_dirs(
    base: &Path,
    current: &Path,
    glob: &globset::GlobMatcher,
    results: &mut Vec<PathBuf>,
) -> Result<(), WorkspaceError> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_dir() || entry.file_name() == "node_modules" {
            continue;
        }

        let relative = path.strip_prefix(base).unwrap_or(&path);

        if glob.is_match(relative) {
            results.push(path.clone());
        }

        collect_matching_dirs(base, &path, glob, results)?;
    }

    Ok(())
}
