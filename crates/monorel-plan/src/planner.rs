use indexmap::IndexMap;
use monorel_commit::{aggregate, Commit};
use monorel_core::{BumpKind, ChangeKind, OverrideMap, PackageRelease, VersionOverride};
use monorel_graph::DependencyGraph;
use monorel_version::{bump, bump_type_between};
use monorel_workspace::Package;
use semver::Version;

use crate::error::PlanError;
use crate::interaction::{InteractionProvider, OverrideDecision, VersionChoice, VersionPrompt};

/// Inputs for one planning run. The commit map holds, per package, the
/// union of its direct commits and the global commits attributed to it;
/// the engine never distinguishes the two again.
#[derive(Debug)]
pub struct PlanInput<'a> {
    pub packages: &'a [Package],
    pub graph: &'a DependencyGraph,
    pub commits: &'a IndexMap<String, Vec<Commit>>,
    pub overrides: &'a OverrideMap,
    pub interactive: bool,
}

/// A finished plan plus the override set to persist for the next run.
#[derive(Debug)]
pub struct PlanOutcome {
    pub releases: Vec<PackageRelease>,
    pub overrides: OverrideMap,
    /// The direct pass was cut short by a run-level interrupt. Records
    /// emitted before the interrupt are kept and cascaded.
    pub interrupted: bool,
}

/// Runs the full planning state machine: direct pass over packages with
/// commits, manual pass over the rest (interactive only), then the
/// dependency cascade.
///
/// Re-running with identical commits and an unmodified override set
/// yields an identical outcome.
///
/// # Errors
///
/// Propagates interaction and version-arithmetic failures. A run-level
/// interrupt is not an error here; it surfaces as
/// `PlanOutcome::interrupted`.
pub fn plan(
    input: &PlanInput<'_>,
    provider: &dyn InteractionProvider,
) -> Result<PlanOutcome, PlanError> {
    let lookup: IndexMap<&str, &Package> = input
        .packages
        .iter()
        .map(|package| (package.name.as_str(), package))
        .collect();

    let mut overrides = input.overrides.clone();
    let mut releases: Vec<PackageRelease> = Vec::new();
    let mut interrupted = false;

    for (name, commits) in input.commits {
        let Some(package) = lookup.get(name.as_str()).copied() else {
            tracing::warn!(package = %name, "commit group names a package missing from the workspace, skipping");
            continue;
        };

        match plan_package(package, commits, &mut overrides, input.interactive, provider) {
            Ok(Some(release)) => releases.push(release),
            Ok(None) => {}
            Err(PlanError::Interrupted) => {
                interrupted = true;
                break;
            }
            Err(err) => return Err(err),
        }
    }

    if input.interactive && !interrupted {
        interrupted = manual_pass(input, &mut releases, provider)?;
    }

    cascade(&mut releases, &overrides, input.graph, &lookup);

    Ok(PlanOutcome {
        releases,
        overrides,
        interrupted,
    })
}

fn plan_package(
    package: &Package,
    commits: &[Commit],
    overrides: &mut OverrideMap,
    interactive: bool,
    provider: &dyn InteractionProvider,
) -> Result<Option<PackageRelease>, PlanError> {
    let determined = aggregate(commits);
    let has_direct_changes = !commits.is_empty();

    // An override recorded against an earlier release cycle would send
    // the version backwards; discard it instead of replaying it.
    let existing = match overrides.get(&package.name).cloned() {
        Some(stale) if stale.version < package.version => {
            tracing::warn!(
                package = %package.name,
                stored = %stale.version,
                current = %package.version,
                "stored version decision is behind the current version, discarding"
            );
            overrides.shift_remove(&package.name);
            None
        }
        other => other,
    };

    if !interactive {
        return Ok(replay(package, determined, existing.as_ref(), has_direct_changes));
    }

    if let Some(existing) = &existing {
        match provider.resolve_override(&package.name, existing)? {
            OverrideDecision::UseOverride => {
                return Ok(replay(
                    package,
                    determined,
                    Some(existing),
                    has_direct_changes,
                ));
            }
            OverrideDecision::PickAnother => {}
            OverrideDecision::Cancelled => return Ok(None),
        }
    }

    let suggested = bump(&package.version, determined);
    let prompt = VersionPrompt {
        package: &package.name,
        current_version: &package.version,
        suggested_version: &suggested,
        determined_bump: determined,
        commits,
    };

    let selected = match provider.select_version(&prompt)? {
        VersionChoice::Suggested => suggested,
        VersionChoice::Bump(kind) => bump(&package.version, kind),
        VersionChoice::Custom(version) => version,
        VersionChoice::Prerelease(strategy, tag) => {
            monorel_version::apply_prerelease(&package.version, strategy, tag)?
        }
        VersionChoice::AsIs => {
            if determined.is_none() {
                overrides.shift_remove(&package.name);
            } else {
                overrides.insert(
                    package.name.clone(),
                    VersionOverride {
                        bump: BumpKind::None,
                        version: package.version.clone(),
                    },
                );
            }
            return Ok(Some(PackageRelease {
                package: package.name.clone(),
                current_version: package.version.clone(),
                new_version: package.version.clone(),
                bump_type: BumpKind::None,
                has_direct_changes,
                change_kind: ChangeKind::AsIs,
            }));
        }
        VersionChoice::Skip | VersionChoice::Cancelled => return Ok(None),
    };

    Ok(Some(record_selection(
        package,
        determined,
        selected,
        overrides,
        has_direct_changes,
    )))
}

/// Non-interactive resolution: persisted overrides replay verbatim,
/// everything else follows the determined bump.
fn replay(
    package: &Package,
    determined: BumpKind,
    existing: Option<&VersionOverride>,
    has_direct_changes: bool,
) -> Option<PackageRelease> {
    match existing {
        Some(existing) => Some(PackageRelease {
            package: package.name.clone(),
            current_version: package.version.clone(),
            new_version: existing.version.clone(),
            bump_type: existing.bump,
            has_direct_changes,
            change_kind: if existing.bump.is_none() {
                ChangeKind::AsIs
            } else {
                ChangeKind::Auto
            },
        }),
        None if determined.is_none() => None,
        None => Some(PackageRelease {
            package: package.name.clone(),
            current_version: package.version.clone(),
            new_version: bump(&package.version, determined),
            bump_type: determined,
            has_direct_changes,
            change_kind: ChangeKind::Auto,
        }),
    }
}

/// Persists or clears the override for a concrete human selection: a
/// downgrade below the determined bump is remembered, agreement or
/// escalation clears any stale entry.
fn record_selection(
    package: &Package,
    determined: BumpKind,
    selected: Version,
    overrides: &mut OverrideMap,
    has_direct_changes: bool,
) -> PackageRelease {
    let user_bump = bump_type_between(&package.version, &selected);

    if user_bump < determined {
        overrides.insert(
            package.name.clone(),
            VersionOverride {
                bump: user_bump,
                version: selected.clone(),
            },
        );
    } else {
        overrides.shift_remove(&package.name);
    }

    PackageRelease {
        package: package.name.clone(),
        current_version: package.version.clone(),
        new_version: selected,
        bump_type: user_bump,
        has_direct_changes,
        change_kind: ChangeKind::Auto,
    }
}

/// Offers a version prompt to every commit-less package. Returns true
/// when the pass was interrupted.
fn manual_pass(
    input: &PlanInput<'_>,
    releases: &mut Vec<PackageRelease>,
    provider: &dyn InteractionProvider,
) -> Result<bool, PlanError> {
    for package in input.packages {
        if input.commits.contains_key(&package.name)
            || releases.iter().any(|r| r.package == package.name)
        {
            continue;
        }

        let choice = match provider.select_manual_version(&package.name, &package.version) {
            Ok(choice) => choice,
            Err(PlanError::Interrupted) => return Ok(true),
            Err(err) => return Err(err),
        };

        let new_version = match choice {
            VersionChoice::Bump(kind) => bump(&package.version, kind),
            VersionChoice::Custom(version) => version,
            VersionChoice::Prerelease(strategy, tag) => {
                monorel_version::apply_prerelease(&package.version, strategy, tag)?
            }
            VersionChoice::Suggested
            | VersionChoice::AsIs
            | VersionChoice::Skip
            | VersionChoice::Cancelled => continue,
        };

        releases.push(PackageRelease {
            bump_type: bump_type_between(&package.version, &new_version),
            package: package.name.clone(),
            current_version: package.version.clone(),
            new_version,
            has_direct_changes: false,
            change_kind: ChangeKind::Manual,
        });
    }

    Ok(false)
}

/// Gives every transitive dependent of a releasing package a release
/// record of its own, at minimum a patch bump, unless it opted out via
/// an as-is decision.
fn cascade(
    releases: &mut Vec<PackageRelease>,
    overrides: &OverrideMap,
    graph: &DependencyGraph,
    lookup: &IndexMap<&str, &Package>,
) {
    let roots: Vec<String> = releases
        .iter()
        .filter(|release| {
            !release.bump_type.is_none()
                || (release.change_kind == ChangeKind::AsIs && release.has_direct_changes)
        })
        .map(|release| release.package.clone())
        .collect();

    if roots.is_empty() {
        return;
    }

    for (name, _level) in graph.dependent_closure(&roots) {
        if releases.iter().any(|release| release.package == name) {
            continue;
        }
        // An as-is override is an explicit opt-out from the cascade.
        if overrides.get(&name).is_some_and(|existing| existing.bump.is_none()) {
            continue;
        }
        let Some(package) = lookup.get(name.as_str()).copied() else {
            continue;
        };

        releases.push(PackageRelease {
            package: name,
            current_version: package.version.clone(),
            new_version: bump(&package.version, BumpKind::Patch),
            bump_type: BumpKind::Patch,
            has_direct_changes: false,
            change_kind: ChangeKind::Auto,
        });
    }
}
