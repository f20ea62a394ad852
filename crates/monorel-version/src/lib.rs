use std::fmt;

use monorel_core::BumpKind;
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version '{input}'")]
    InvalidVersion {
        input: String,
        #[source]
        source: semver::Error,
    },

    #[error("'{version}' is not a pre-release version")]
    NotAPrerelease { version: Version },

    #[error("pre-release identifier of '{version}' has no trailing number to increment")]
    UnnumberedPrerelease { version: Version },
}

pub type Result<T> = std::result::Result<T, VersionError>;

/// Applies a bump to a version. `BumpKind::None` is the identity;
/// any real bump clears pre-release and build metadata.
#[must_use]
pub fn bump(version: &Version, kind: BumpKind) -> Version {
    let mut next = version.clone();

    match kind {
        BumpKind::None => return next,
        BumpKind::Major => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
        }
        BumpKind::Minor => {
            next.minor += 1;
            next.patch = 0;
        }
        BumpKind::Patch => {
            next.patch += 1;
        }
    }

    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;
    next
}

/// Classifies the jump between two versions as a bump kind: the inverse
/// of [`bump`], used to compare a human's selection against the
/// automatically determined severity.
#[must_use]
pub fn bump_type_between(current: &Version, selected: &Version) -> BumpKind {
    if selected.major != current.major {
        BumpKind::Major
    } else if selected.minor != current.minor {
        BumpKind::Minor
    } else if selected.patch != current.patch || selected.pre != current.pre {
        BumpKind::Patch
    } else {
        BumpKind::None
    }
}

/// Parses a user-supplied version string, e.g. from the `custom` prompt.
///
/// # Errors
///
/// Returns [`VersionError::InvalidVersion`] for anything `semver`
/// rejects.
pub fn parse_version(input: &str) -> Result<Version> {
    Version::parse(input.trim()).map_err(|source| VersionError::InvalidVersion {
        input: input.to_string(),
        source,
    })
}

/// Pre-release identifier offered by the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrereleaseTag {
    Alpha,
    Beta,
}

impl PrereleaseTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
        }
    }
}

impl fmt::Display for PrereleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy for continuing or starting a pre-release train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrereleaseStrategy {
    /// Increment the counter of the current pre-release identifier,
    /// or switch trains when a different tag is requested.
    Next,
    Prepatch,
    Preminor,
    Premajor,
}

/// Computes the next pre-release version under a strategy.
///
/// `Next` continues the existing train (`1.2.0-beta.3` -> `1.2.0-beta.4`)
/// or restarts the counter when the tag changes (`-beta.3` + alpha ->
/// `-alpha.0`). The `pre*` strategies bump first, then open a fresh
/// `tag.0` train.
///
/// # Errors
///
/// `Next` requires the current version to be a numbered pre-release.
pub fn apply_prerelease(
    version: &Version,
    strategy: PrereleaseStrategy,
    tag: PrereleaseTag,
) -> Result<Version> {
    let mut next = match strategy {
        PrereleaseStrategy::Next => {
            if version.pre.is_empty() {
                return Err(VersionError::NotAPrerelease {
                    version: version.clone(),
                });
            }
            let mut next = version.clone();
            next.pre = continue_train(version, tag)?;
            next.build = BuildMetadata::EMPTY;
            return Ok(next);
        }
        PrereleaseStrategy::Prepatch => bump(version, BumpKind::Patch),
        PrereleaseStrategy::Preminor => bump(version, BumpKind::Minor),
        PrereleaseStrategy::Premajor => bump(version, BumpKind::Major),
    };

    next.pre = new_train(tag)?;
    Ok(next)
}

fn continue_train(version: &Version, tag: PrereleaseTag) -> Result<Prerelease> {
    let pre = version.pre.as_str();
    let (ident, counter) = match pre.rsplit_once('.') {
        Some((ident, counter)) => (ident, counter),
        None => (pre, ""),
    };

    if ident == tag.as_str() {
        let n: u64 = counter
            .parse()
            .map_err(|_| VersionError::UnnumberedPrerelease {
                version: version.clone(),
            })?;
        make_pre(&format!("{}.{}", tag.as_str(), n + 1), version)
    } else {
        new_train(tag)
    }
}

fn new_train(tag: PrereleaseTag) -> Result<Prerelease> {
    Prerelease::new(&format!("{}.0", tag.as_str())).map_err(|source| {
        VersionError::InvalidVersion {
            input: format!("{}.0", tag.as_str()),
            source,
        }
    })
}

fn make_pre(ident: &str, version: &Version) -> Result<Prerelease> {
    Prerelease::new(ident).map_err(|_| VersionError::UnnumberedPrerelease {
        version: version.clone(),
    })
}
