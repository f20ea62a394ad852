use indexmap::IndexMap;
use monorel_core::PackageRelease;
use monorel_workspace::{Package, Workspace, WORKSPACE_RANGE_PREFIX};
use semver::Version;
use serde_json::Value;

use crate::error::ManifestError;

/// The manifest document a release leaves behind: `version` set to the
/// new version and ranges on released workspace members rewritten.
/// `released` maps member names to their final versions; ranges
/// beginning with the workspace sentinel are never touched.
#[must_use]
pub fn updated_manifest(
    package: &Package,
    new_version: &Version,
    released: &IndexMap<String, Version>,
) -> Value {
    let mut manifest = package.manifest.clone();

    if let Some(object) = manifest.as_object_mut() {
        object.insert(
            "version".to_string(),
            Value::String(new_version.to_string()),
        );
    }

    for key in ["dependencies", "devDependencies"] {
        rewrite_ranges(&mut manifest, key, released, |version| format!("^{version}"));
    }
    rewrite_ranges(&mut manifest, "peerDependencies", released, |version| {
        format!(">={version} <{}.0.0", version.major + 1)
    });

    manifest
}

fn rewrite_ranges(
    manifest: &mut Value,
    key: &str,
    released: &IndexMap<String, Version>,
    range_for: impl Fn(&Version) -> String,
) {
    let Some(ranges) = manifest.get_mut(key).and_then(Value::as_object_mut) else {
        return;
    };

    for (name, range) in ranges.iter_mut() {
        let Some(version) = released.get(name) else {
            continue;
        };
        if range
            .as_str()
            .is_some_and(|r| r.starts_with(WORKSPACE_RANGE_PREFIX))
        {
            continue;
        }
        *range = Value::String(range_for(version));
    }
}

/// Pretty-printed JSON with a trailing newline, matching what package
/// managers write.
///
/// # Errors
///
/// Returns `ManifestError::Serialize` when the document cannot be
/// serialized.
pub fn render_manifest(package: &str, manifest: &Value) -> Result<String, ManifestError> {
    let rendered =
        serde_json::to_string_pretty(manifest).map_err(|source| ManifestError::Serialize {
            package: package.to_string(),
            source,
        })?;
    Ok(format!("{rendered}\n"))
}

/// Writes every released package's manifest, one file per package, in
/// parallel. Must only be called with a complete plan: dependency
/// ranges are resolved against the final version of every release.
///
/// # Errors
///
/// Returns the first write or serialization failure.
pub fn write_manifests(
    workspace: &Workspace,
    releases: &[PackageRelease],
) -> Result<(), ManifestError> {
    // Version-changing releases drive range rewrites; as-is records
    // keep every range as it was.
    let released: IndexMap<String, Version> = releases
        .iter()
        .filter(|release| !release.bump_type.is_none())
        .map(|release| (release.package.clone(), release.new_version.clone()))
        .collect();

    let mut jobs: Vec<(&Package, String)> = Vec::with_capacity(releases.len());
    for release in releases {
        let Some(package) = workspace
            .packages
            .iter()
            .find(|package| package.name == release.package)
        else {
            tracing::warn!(package = %release.package, "release refers to a package missing from the workspace, skipping write");
            continue;
        };

        let manifest = updated_manifest(package, &release.new_version, &released);
        jobs.push((package, render_manifest(&package.name, &manifest)?));
    }

    std::thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|(package, content)| {
                scope.spawn(move || {
                    let path = package.manifest_path();
                    std::fs::write(&path, content)
                        .map_err(|source| ManifestError::Write { path, source })
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(result) => result?,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok(())
    })
}
