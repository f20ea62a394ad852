use std::fs;
use std::path::Path;

use monorel_core::OverrideMap;

use crate::error::{CliError, Result};

/// Loads the persisted override map; a missing file is an empty map.
pub fn load(path: &Path) -> Result<OverrideMap> {
    match fs::read_to_string(path) {
        Ok(content) => {
            serde_json::from_str(&content).map_err(|source| CliError::OverridesParse {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(OverrideMap::new()),
        Err(err) => Err(CliError::Io(err)),
    }
}

/// Persists the override map, removing the file when the map is empty
/// so a clean state leaves no artifact behind.
pub fn save(path: &Path, overrides: &OverrideMap) -> Result<()> {
    if overrides.is_empty() {
        return match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CliError::Io(err)),
        };
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(overrides)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use monorel_core::{BumpKind, OverrideMap, VersionOverride};
    use semver::Version;

    use super::{load, save};

    #[test]
    fn missing_file_is_an_empty_map() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let map = load(&dir.path().join(".monorel/overrides.json"))?;
        assert!(map.is_empty());
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(".monorel/overrides.json");

        let mut map = OverrideMap::new();
        map.insert(
            "@scope/a".to_string(),
            VersionOverride {
                bump: BumpKind::Patch,
                version: Version::new(1, 2, 4),
            },
        );
        save(&path, &map)?;

        assert_eq!(load(&path)?, map);
        Ok(())
    }

    #[test]
    fn empty_map_removes_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("overrides.json");

        let mut map = OverrideMap::new();
        map.insert(
            "a".to_string(),
            VersionOverride {
                bump: BumpKind::None,
                version: Version::new(1, 0, 0),
            },
        );
        save(&path, &map)?;
        assert!(path.exists());

        save(&path, &OverrideMap::new())?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn malformed_file_is_a_parse_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, "{not json")?;

        let err = load(&path).expect_err("should fail");
        assert!(err.to_string().contains("overrides.json"));
        Ok(())
    }
}
