use monorel_commit::Commit;
use monorel_core::{BumpKind, VersionOverride};
use monorel_version::{PrereleaseStrategy, PrereleaseTag};
use semver::Version;

use crate::error::PlanError;

/// Everything a prompt needs to show for one package.
#[derive(Debug)]
pub struct VersionPrompt<'a> {
    pub package: &'a str,
    pub current_version: &'a Version,
    /// `bump(current_version, determined_bump)`; equals the current
    /// version when nothing qualifies.
    pub suggested_version: &'a Version,
    pub determined_bump: BumpKind,
    pub commits: &'a [Commit],
}

/// First question when a persisted override exists for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideDecision {
    UseOverride,
    PickAnother,
    Cancelled,
}

/// Outcome of the version-selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChoice {
    /// Accept the suggested version.
    Suggested,
    /// Explicit bump recomputed off the current version.
    Bump(BumpKind),
    /// Keep the current version but record the decision.
    AsIs,
    /// Free-form version; the provider validates before returning.
    Custom(Version),
    /// Pre-release sub-menu selection.
    Prerelease(PrereleaseStrategy, PrereleaseTag),
    /// No release for this package.
    Skip,
    /// Esc: drop this package from the run, leaving everything as it
    /// was.
    Cancelled,
}

/// Seam between the plan engine and whatever asks the human.
///
/// Implementations signal a run-level abort by returning
/// `PlanError::Interrupted`.
pub trait InteractionProvider {
    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn resolve_override(
        &self,
        package: &str,
        existing: &VersionOverride,
    ) -> Result<OverrideDecision, PlanError>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_version(&self, prompt: &VersionPrompt<'_>) -> Result<VersionChoice, PlanError>;

    /// Second-pass prompt for a package without qualifying commits;
    /// the expected answer is usually `Skip`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_manual_version(
        &self,
        package: &str,
        current_version: &Version,
    ) -> Result<VersionChoice, PlanError>;
}
