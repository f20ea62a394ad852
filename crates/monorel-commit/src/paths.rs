use std::path::Path;

/// Reports whether a changed file is a dependency manifest or lockfile.
///
/// Used upstream to decide whether a cross-cutting commit counts as a
/// dependency change for global-commit attribution.
#[must_use]
pub fn is_dependency_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    if name == "package.json" || name == "pnpm-workspace.yaml" {
        return true;
    }

    // package-lock.json, pnpm-lock.yaml and friends.
    name.contains("-lock.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_nested_manifests_match() {
        assert!(is_dependency_file(Path::new("package.json")));
        assert!(is_dependency_file(Path::new("packages/core/package.json")));
    }

    #[test]
    fn lockfiles_match() {
        assert!(is_dependency_file(Path::new("package-lock.json")));
        assert!(is_dependency_file(Path::new("pnpm-lock.yaml")));
    }

    #[test]
    fn workspace_manifest_matches() {
        assert!(is_dependency_file(Path::new("pnpm-workspace.yaml")));
    }

    #[test]
    fn source_files_do_not_match() {
        assert!(!is_dependency_file(Path::new("src/index.ts")));
        assert!(!is_dependency_file(Path::new("packages/core/README.md")));
        assert!(!is_dependency_file(Path::new("yarn.locked.txt")));
    }
}
