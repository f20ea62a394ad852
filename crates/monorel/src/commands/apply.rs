use std::path::{Path, PathBuf};

use monorel_changelog::{
    CHANGELOG_FILE_NAME, ReleaseContext, RepositoryInfo, merge, read_changelog, render,
    write_changelog,
};
use monorel_git::Repository;
use monorel_manifest::write_manifests;
use monorel_workspace::Config;

use crate::error::Result;
use crate::{overrides, summary};

use super::{ApplyArgs, Pipeline, compute};

pub(crate) fn run(start_path: &Path, args: &ApplyArgs) -> Result<()> {
    let pipeline = compute(start_path, args.from.as_deref(), args.yes)?;

    if pipeline.outcome.interrupted {
        println!("Run interrupted; nothing was written.");
        return Ok(());
    }
    if pipeline.outcome.releases.is_empty() {
        println!("Nothing to release.");
        return Ok(());
    }

    // The plan is complete before the first write starts.
    write_manifests(&pipeline.workspace, &pipeline.outcome.releases)?;
    let mut changed = manifest_paths(&pipeline);
    changed.extend(write_changelogs(&pipeline)?);

    let overrides_path = pipeline
        .config
        .overrides_file(&pipeline.workspace.root);
    let had_overrides = overrides_path.exists();
    overrides::save(&overrides_path, &pipeline.outcome.overrides)?;
    if overrides_path.exists() || had_overrides {
        changed.push(overrides_path);
    }

    if pipeline.config.git().commit() {
        commit_release(&pipeline, &changed)?;
    }

    print!("{}", summary::render_plan(&pipeline.outcome.releases));
    println!();
    print!("{}", summary::render_pr_summary(&pipeline.outcome.releases));
    Ok(())
}

fn manifest_paths(pipeline: &Pipeline) -> Vec<PathBuf> {
    pipeline
        .outcome
        .releases
        .iter()
        .filter(|release| !release.bump_type.is_none())
        .filter_map(|release| {
            pipeline
                .workspace
                .packages
                .iter()
                .find(|package| package.name == release.package)
        })
        .map(monorel_workspace::Package::manifest_path)
        .collect()
}

fn write_changelogs(pipeline: &Pipeline) -> Result<Vec<PathBuf>> {
    let repo_info = repository_info(&pipeline.config, &pipeline.repository);
    let default_branch = pipeline.repository.default_branch()?;
    let today = chrono::Utc::now().date_naive();

    let mut written = Vec::new();
    for release in &pipeline.outcome.releases {
        let Some(package) = pipeline
            .workspace
            .packages
            .iter()
            .find(|package| package.name == release.package)
        else {
            tracing::warn!(package = %release.package, "release names a package missing from the workspace, skipping changelog");
            continue;
        };

        let commits = pipeline
            .commits
            .get(&release.package)
            .map_or(&[][..], Vec::as_slice);
        if release.bump_type.is_none() && commits.is_empty() {
            continue;
        }

        let changelog_path = package.path.join(CHANGELOG_FILE_NAME);

        // When the changelog has been published on the default branch,
        // merge into that state so a re-run replaces the working-tree
        // draft instead of unioning with it. An absent file at the ref
        // means the working-tree content, if any, is itself the draft.
        let existing = match pipeline
            .repository
            .file_at_ref(&default_branch, &changelog_path)?
        {
            Some(published) => Some(published),
            None => read_changelog(&package.path)?,
        };

        let previous = (release.new_version != release.current_version)
            .then_some(&release.current_version);
        let rendered = render(&ReleaseContext {
            version: &release.new_version,
            previous_version: previous,
            date: today,
            commits,
            repository: repo_info.as_ref(),
            author_credit: pipeline.config.author_credit(),
        });
        let merged = merge(existing.as_deref(), &rendered, &release.package)?;
        write_changelog(&package.path, &merged)?;
        written.push(changelog_path);
    }
    Ok(written)
}

fn repository_info(config: &Config, repository: &Repository) -> Option<RepositoryInfo> {
    let url = match config.repository() {
        Some(url) => url.to_string(),
        None => repository.remote_url().ok().flatten()?,
    };

    match RepositoryInfo::from_url(&url) {
        Ok(info) => Some(info),
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "cannot derive forge links from repository url");
            None
        }
    }
}

fn commit_release(pipeline: &Pipeline, changed: &[PathBuf]) -> Result<()> {
    let paths: Vec<&Path> = changed.iter().map(PathBuf::as_path).collect();
    pipeline.repository.stage_files(&paths)?;

    let packages = pipeline
        .outcome
        .releases
        .iter()
        .filter(|release| !release.bump_type.is_none())
        .map(|release| format!("{}@{}", release.package, release.new_version))
        .collect::<Vec<_>>()
        .join(", ");
    let title = pipeline
        .config
        .git()
        .commit_title_template()
        .replace("{packages}", &packages);

    let info = pipeline.repository.commit(&title)?;
    tracing::info!(sha = %info.sha, "created release commit");

    if pipeline.config.git().push() {
        let branch = pipeline.repository.current_branch()?;
        pipeline.repository.push(&branch)?;
    }
    Ok(())
}
