use dialoguer::{Input, Select};
use monorel_core::{BumpKind, VersionOverride};
use monorel_plan::{
    InteractionProvider, OverrideDecision, PlanError, VersionChoice, VersionPrompt,
};
use monorel_version::{PrereleaseStrategy, PrereleaseTag, parse_version};
use semver::Version;

/// Dialoguer-backed prompts. Esc cancels the current package only;
/// Ctrl-C aborts the rest of the run.
pub struct TerminalInteractionProvider;

fn interaction_error(err: dialoguer::Error) -> PlanError {
    match err {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            PlanError::Interrupted
        }
        dialoguer::Error::IO(io) => PlanError::Interaction(Box::new(io)),
    }
}

impl InteractionProvider for TerminalInteractionProvider {
    fn resolve_override(
        &self,
        package: &str,
        existing: &VersionOverride,
    ) -> Result<OverrideDecision, PlanError> {
        let items = [
            format!("use stored decision ({} -> {})", existing.bump, existing.version),
            String::from("pick another version"),
        ];

        let selection = Select::new()
            .with_prompt(format!("'{package}' has a stored version decision"))
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(interaction_error)?;

        Ok(match selection {
            Some(0) => OverrideDecision::UseOverride,
            Some(_) => OverrideDecision::PickAnother,
            None => OverrideDecision::Cancelled,
        })
    }

    fn select_version(&self, prompt: &VersionPrompt<'_>) -> Result<VersionChoice, PlanError> {
        let mut items = vec![format!(
            "{} - suggested ({})",
            prompt.suggested_version, prompt.determined_bump
        )];
        items.push(String::from("patch"));
        items.push(String::from("minor"));
        items.push(String::from("major"));
        items.push(format!("keep {} (as-is)", prompt.current_version));
        items.push(String::from("custom version"));
        items.push(String::from("pre-release..."));
        items.push(String::from("skip this package"));

        let selection = Select::new()
            .with_prompt(format!(
                "Version for '{}' ({} qualifying commits)",
                prompt.package,
                prompt.commits.len()
            ))
            .items(&items)
            .default(default_selection(prompt, items.len()))
            .interact_opt()
            .map_err(interaction_error)?;

        match selection {
            Some(0) => Ok(VersionChoice::Suggested),
            Some(1) => Ok(VersionChoice::Bump(BumpKind::Patch)),
            Some(2) => Ok(VersionChoice::Bump(BumpKind::Minor)),
            Some(3) => Ok(VersionChoice::Bump(BumpKind::Major)),
            Some(4) => Ok(VersionChoice::AsIs),
            Some(5) => prompt_custom_version(prompt.package).map(VersionChoice::Custom),
            Some(6) => prompt_prerelease(prompt.current_version),
            Some(_) => Ok(VersionChoice::Skip),
            None => Ok(VersionChoice::Cancelled),
        }
    }

    fn select_manual_version(
        &self,
        package: &str,
        current_version: &Version,
    ) -> Result<VersionChoice, PlanError> {
        let items = [
            format!("no change (keep {current_version})"),
            String::from("patch"),
            String::from("minor"),
            String::from("major"),
            String::from("custom version"),
        ];

        let selection = Select::new()
            .with_prompt(format!("'{package}' has no qualifying commits"))
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(interaction_error)?;

        match selection {
            Some(1) => Ok(VersionChoice::Bump(BumpKind::Patch)),
            Some(2) => Ok(VersionChoice::Bump(BumpKind::Minor)),
            Some(3) => Ok(VersionChoice::Bump(BumpKind::Major)),
            Some(4) => prompt_custom_version(package).map(VersionChoice::Custom),
            Some(_) => Ok(VersionChoice::Skip),
            None => Ok(VersionChoice::Cancelled),
        }
    }
}

/// Enter accepts the suggestion only when it actually moves the
/// version; a no-op suggestion preselects the trailing skip entry so
/// that accepting defaults releases nothing.
fn default_selection(prompt: &VersionPrompt<'_>, item_count: usize) -> usize {
    if prompt.suggested_version == prompt.current_version {
        item_count - 1
    } else {
        0
    }
}

fn prompt_custom_version(package: &str) -> Result<Version, PlanError> {
    let input: String = Input::new()
        .with_prompt(format!("New version for '{package}'"))
        .validate_with(|value: &String| {
            parse_version(value).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(interaction_error)?;

    Ok(parse_version(&input)?)
}

fn prompt_prerelease(current_version: &Version) -> Result<VersionChoice, PlanError> {
    let mut strategies = Vec::new();
    if !current_version.pre.is_empty() {
        strategies.push((String::from("next pre-release"), PrereleaseStrategy::Next));
    }
    strategies.push((String::from("prepatch"), PrereleaseStrategy::Prepatch));
    strategies.push((String::from("preminor"), PrereleaseStrategy::Preminor));
    strategies.push((String::from("premajor"), PrereleaseStrategy::Premajor));

    let labels: Vec<&str> = strategies.iter().map(|(label, _)| label.as_str()).collect();
    let Some(strategy_index) = Select::new()
        .with_prompt("Pre-release strategy")
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(interaction_error)?
    else {
        return Ok(VersionChoice::Cancelled);
    };

    let tags = [PrereleaseTag::Alpha, PrereleaseTag::Beta];
    let tag_labels: Vec<&str> = tags.iter().map(|tag| tag.as_str()).collect();
    let Some(tag_index) = Select::new()
        .with_prompt("Pre-release tag")
        .items(&tag_labels)
        .default(0)
        .interact_opt()
        .map_err(interaction_error)?
    else {
        return Ok(VersionChoice::Cancelled);
    };

    Ok(VersionChoice::Prerelease(
        strategies[strategy_index].1,
        tags[tag_index],
    ))
}

/// Stand-in provider for unattended runs. The plan engine never
/// consults the provider when `interactive` is off, so every answer
/// here is the conservative default.
pub struct NonInteractiveProvider;

impl InteractionProvider for NonInteractiveProvider {
    fn resolve_override(
        &self,
        _package: &str,
        _existing: &VersionOverride,
    ) -> Result<OverrideDecision, PlanError> {
        Ok(OverrideDecision::UseOverride)
    }

    fn select_version(&self, _prompt: &VersionPrompt<'_>) -> Result<VersionChoice, PlanError> {
        Ok(VersionChoice::Suggested)
    }

    fn select_manual_version(
        &self,
        _package: &str,
        _current_version: &Version,
    ) -> Result<VersionChoice, PlanError> {
        Ok(VersionChoice::Skip)
    }
}
