use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::WorkspaceError;

pub const CONFIG_FILE_NAME: &str = "monorel.toml";
pub const DEFAULT_OVERRIDES_FILE: &str = ".monorel/overrides.json";

/// Which commits outside every package directory are attributed to
/// packages during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAttribution {
    /// Global commits are dropped.
    Off,
    /// Only global commits touching dependency files count.
    #[default]
    Dependencies,
    /// Every global commit counts for every package.
    All,
}

/// Root configuration read from `monorel.toml`. A missing file yields
/// the defaults; a malformed one is fatal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    global_attribution: GlobalAttribution,
    /// Forge URL used when rendering commit and reference links,
    /// e.g. `https://github.com/acme/widgets`.
    repository: Option<String>,
    author_credit: bool,
    overrides_file: PathBuf,
    git: GitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global_attribution: GlobalAttribution::default(),
            repository: None,
            author_credit: true,
            overrides_file: PathBuf::from(DEFAULT_OVERRIDES_FILE),
            git: GitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    commit: bool,
    /// Pushing implies committing.
    push: bool,
    commit_title_template: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            commit: false,
            push: false,
            commit_title_template: String::from("chore: release {packages}"),
        }
    }
}

impl GitConfig {
    #[must_use]
    pub fn commit(&self) -> bool {
        self.commit || self.push
    }

    #[must_use]
    pub fn push(&self) -> bool {
        self.push
    }

    #[must_use]
    pub fn commit_title_template(&self) -> &str {
        &self.commit_title_template
    }
}

impl Config {
    /// Reads `monorel.toml` from `root`, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::ConfigRead` / `ConfigParse` for an
    /// unreadable or malformed file.
    pub fn load(root: &Path) -> Result<Self, WorkspaceError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(&path).map_err(|source| WorkspaceError::ConfigRead {
                path: path.clone(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| WorkspaceError::ConfigParse { path, source })
    }

    #[must_use]
    pub fn global_attribution(&self) -> GlobalAttribution {
        self.global_attribution
    }

    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    #[must_use]
    pub fn author_credit(&self) -> bool {
        self.author_credit
    }

    /// Path of the persisted override map, relative to the workspace
    /// root unless absolute.
    #[must_use]
    pub fn overrides_file(&self, root: &Path) -> PathBuf {
        if self.overrides_file.is_absolute() {
            self.overrides_file.clone()
        } else {
            root.join(&self.overrides_file)
        }
    }

    #[must_use]
    pub fn git(&self) -> &GitConfig {
        &self.git
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::load(dir.path())?;

        assert_eq!(config.global_attribution(), GlobalAttribution::Dependencies);
        assert!(config.repository().is_none());
        assert!(config.author_credit());
        assert_eq!(
            config.overrides_file(dir.path()),
            dir.path().join(DEFAULT_OVERRIDES_FILE)
        );
        assert!(!config.git().commit());
        Ok(())
    }

    #[test]
    fn parses_full_configuration() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
global_attribution = "all"
repository = "https://github.com/acme/widgets"
author_credit = false
overrides_file = "release/overrides.json"

[git]
commit = true
push = true
commit_title_template = "release: {packages}"
"#,
        )?;

        let config = Config::load(dir.path())?;
        assert_eq!(config.global_attribution(), GlobalAttribution::All);
        assert_eq!(
            config.repository(),
            Some("https://github.com/acme/widgets")
        );
        assert!(!config.author_credit());
        assert_eq!(
            config.overrides_file(dir.path()),
            dir.path().join("release/overrides.json")
        );
        assert!(config.git().commit());
        assert!(config.git().push());
        assert_eq!(config.git().commit_title_template(), "release: {packages}");
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "attributionn = \"all\"\n")?;

        let result = Config::load(dir.path());
        assert!(matches!(result, Err(WorkspaceError::ConfigParse { .. })));
        Ok(())
    }
}
