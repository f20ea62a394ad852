use std::path::Path;

use indexmap::IndexMap;
use monorel_commit::{Commit, is_dependency_file, parse_commit};
use monorel_git::Repository;
use monorel_workspace::{GlobalAttribution, Workspace};

use crate::error::Result;

/// Commits grouped per package for one planning run. Each package's
/// list is the union of its direct commits and the global commits the
/// attribution policy assigns to it; the plan engine never
/// distinguishes the two again.
pub fn collect_commits(
    repository: &Repository,
    workspace: &Workspace,
    from: Option<&str>,
    attribution: GlobalAttribution,
) -> Result<IndexMap<String, Vec<Commit>>> {
    let base = match from {
        Some(refspec) => refspec.to_string(),
        None => {
            let default = repository.default_branch()?;
            repository.merge_base(&default, "HEAD")?
        }
    };

    // The workspace root is canonicalized at discovery; bring the git
    // root to the same form before mapping changed files onto packages.
    let repo_root = repository
        .root()
        .canonicalize()
        .unwrap_or_else(|_| repository.root().to_path_buf());

    let mut groups: IndexMap<String, Vec<Commit>> = IndexMap::new();
    for logged in repository.commits_between(&base, "HEAD")? {
        let commit = parse_commit(&logged.raw);

        let mut touched: Vec<&str> = Vec::new();
        let mut outside: Vec<&Path> = Vec::new();
        for file in &logged.changed_files {
            let absolute = repo_root.join(file);
            let Ok(relative) = absolute.strip_prefix(&workspace.root) else {
                outside.push(file);
                continue;
            };
            match workspace.package_for_file(relative) {
                Some(package) => {
                    if !touched.contains(&package.name.as_str()) {
                        touched.push(&package.name);
                    }
                }
                None => outside.push(file),
            }
        }

        let attribute_globally = !outside.is_empty()
            && match attribution {
                GlobalAttribution::Off => false,
                GlobalAttribution::Dependencies => {
                    outside.iter().any(|file| is_dependency_file(file))
                }
                GlobalAttribution::All => true,
            };

        if attribute_globally {
            for package in &workspace.packages {
                groups
                    .entry(package.name.clone())
                    .or_default()
                    .push(commit.clone());
            }
        } else {
            for name in touched {
                groups
                    .entry(name.to_string())
                    .or_default()
                    .push(commit.clone());
            }
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use monorel_git::Repository;
    use monorel_workspace::{GlobalAttribution, Workspace, discover_workspace};

    use super::collect_commits;

    fn write_manifest(dir: &Path, content: &str) -> anyhow::Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("package.json"), content)?;
        Ok(())
    }

    fn commit_all(repo: &git2::Repository, message: &str) -> anyhow::Result<String> {
        let mut index = repo.index()?;
        index.add_all(["*"], git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let sig = git2::Signature::now("Test", "test@example.com")?;
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        Ok(oid.to_string())
    }

    fn fixture() -> anyhow::Result<(tempfile::TempDir, git2::Repository, Workspace, String)> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        write_manifest(
            root,
            r#"{"name": "root", "version": "0.0.0", "private": true, "workspaces": ["packages/*"]}"#,
        )?;
        write_manifest(
            &root.join("packages/a"),
            r#"{"name": "a", "version": "1.0.0"}"#,
        )?;
        write_manifest(
            &root.join("packages/b"),
            r#"{"name": "b", "version": "2.0.0"}"#,
        )?;

        let repo = git2::Repository::init(root)?;
        repo.config()?.set_str("user.name", "Test")?;
        repo.config()?.set_str("user.email", "test@example.com")?;
        let base = commit_all(&repo, "chore: init")?;

        let workspace = discover_workspace(root)?;
        Ok((dir, repo, workspace, base))
    }

    #[test]
    fn direct_commits_group_by_package() -> anyhow::Result<()> {
        let (dir, repo, workspace, base) = fixture()?;

        fs::write(dir.path().join("packages/a/index.js"), "a")?;
        commit_all(&repo, "feat: new thing in a")?;
        fs::write(dir.path().join("packages/b/index.js"), "b")?;
        commit_all(&repo, "fix: patch b")?;

        let repository = Repository::open(dir.path())?;
        let groups = collect_commits(
            &repository,
            &workspace,
            Some(&base),
            GlobalAttribution::Dependencies,
        )?;

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["a"].len(), 1);
        assert_eq!(groups["a"][0].description, "new thing in a");
        assert_eq!(groups["b"].len(), 1);
        Ok(())
    }

    #[test]
    fn dependency_policy_attributes_lockfile_commits_to_everyone() -> anyhow::Result<()> {
        let (dir, repo, workspace, base) = fixture()?;

        fs::write(dir.path().join("package-lock.json"), "{}")?;
        commit_all(&repo, "chore: update lockfile")?;
        fs::write(dir.path().join("README.md"), "docs")?;
        commit_all(&repo, "docs: readme")?;

        let repository = Repository::open(dir.path())?;
        let groups = collect_commits(
            &repository,
            &workspace,
            Some(&base),
            GlobalAttribution::Dependencies,
        )?;

        // The lockfile commit reaches both packages, the readme one none.
        assert_eq!(groups["a"].len(), 1);
        assert_eq!(groups["b"].len(), 1);
        assert_eq!(groups["a"][0].description, "update lockfile");
        Ok(())
    }

    #[test]
    fn off_policy_drops_global_commits() -> anyhow::Result<()> {
        let (dir, repo, workspace, base) = fixture()?;

        fs::write(dir.path().join("package-lock.json"), "{}")?;
        commit_all(&repo, "chore: update lockfile")?;

        let repository = Repository::open(dir.path())?;
        let groups =
            collect_commits(&repository, &workspace, Some(&base), GlobalAttribution::Off)?;

        assert!(groups.is_empty());
        Ok(())
    }

    #[test]
    fn all_policy_attributes_every_global_commit() -> anyhow::Result<()> {
        let (dir, repo, workspace, base) = fixture()?;

        fs::write(dir.path().join("README.md"), "docs")?;
        commit_all(&repo, "feat: repo-wide behavior change")?;

        let repository = Repository::open(dir.path())?;
        let groups =
            collect_commits(&repository, &workspace, Some(&base), GlobalAttribution::All)?;

        assert_eq!(groups["a"].len(), 1);
        assert_eq!(groups["b"].len(), 1);
        Ok(())
    }
}
