use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a semantic-version increment, totally ordered.
///
/// `None` doubles as the "nothing to do" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    None,
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error)]
#[error("invalid bump kind '{input}' (expected none, patch, minor or major)")]
pub struct ParseBumpKindError {
    pub input: String,
}

impl FromStr for BumpKind {
    type Err = ParseBumpKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            _ => Err(ParseBumpKindError {
                input: s.to_string(),
            }),
        }
    }
}

/// How a release entry came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// Inferred from commits (directly or through the dependency cascade).
    Auto,
    /// Chosen by hand for a package without qualifying commits.
    Manual,
    /// Explicit "keep the current version" decision, still recorded.
    AsIs,
}

/// A persisted human decision that deviates from the inferred bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionOverride {
    #[serde(rename = "type")]
    pub bump: BumpKind,
    pub version: Version,
}

/// Override decisions keyed by package name. Built once per run and
/// treated as immutable; the plan engine returns a new map instead of
/// mutating this one.
pub type OverrideMap = IndexMap<String, VersionOverride>;

/// One package's slot in a finalized release plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRelease {
    pub package: String,
    pub current_version: Version,
    pub new_version: Version,
    pub bump_type: BumpKind,
    pub has_direct_changes: bool,
    pub change_kind: ChangeKind,
}
