use std::path::PathBuf;

use chrono::DateTime;
use monorel_commit::RawCommit;

use crate::types::LoggedCommit;
use crate::Result;

use super::Repository;

impl Repository {
    /// Commits reachable from `head` but not from `base`, oldest first,
    /// each with the files it changed against its first parent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GitError::RefNotFound`] if either ref cannot be
    /// resolved.
    pub fn commits_between(&self, base: &str, head: &str) -> Result<Vec<LoggedCommit>> {
        let base_commit = self.resolve_commit(base)?;
        let head_commit = self.resolve_commit(head)?;

        let mut revwalk = self.inner.revwalk()?;
        revwalk.push(head_commit.id())?;
        revwalk.hide(base_commit.id())?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.inner.find_commit(oid?)?;
            commits.push(LoggedCommit {
                raw: raw_commit(&commit),
                changed_files: self.commit_changed_files(&commit)?,
            });
        }
        Ok(commits)
    }

    fn commit_changed_files(&self, commit: &git2::Commit<'_>) -> Result<Vec<PathBuf>> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let diff = self
            .inner
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

fn raw_commit(commit: &git2::Commit<'_>) -> RawCommit {
    let author = commit.author();
    let date = DateTime::from_timestamp(commit.time().seconds(), 0)
        .unwrap_or(DateTime::UNIX_EPOCH);

    RawCommit {
        hash: commit.id().to_string(),
        summary: commit.summary().unwrap_or_default().to_string(),
        body: commit.body().unwrap_or_default().to_string(),
        author_name: author.name().unwrap_or_default().to_string(),
        author_email: author.email().unwrap_or_default().to_string(),
        date,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::super::tests::{commit_file, setup_test_repo};

    #[test]
    fn yields_commits_oldest_first_with_changed_files() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let base = repo.inner.head()?.peel_to_commit()?.id().to_string();

        commit_file(&repo, "packages/a/index.js", "1", "feat: one")?;
        commit_file(&repo, "packages/b/index.js", "2", "fix: two")?;

        let commits = repo.commits_between(&base, "HEAD")?;
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].raw.summary, "feat: one");
        assert_eq!(
            commits[0].changed_files,
            [PathBuf::from("packages/a/index.js")]
        );
        assert_eq!(commits[1].raw.summary, "fix: two");
        Ok(())
    }

    #[test]
    fn identical_refs_yield_no_commits() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let commits = repo.commits_between("HEAD", "HEAD")?;
        assert!(commits.is_empty());
        Ok(())
    }

    #[test]
    fn author_metadata_is_carried_over() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let base = repo.inner.head()?.peel_to_commit()?.id().to_string();
        commit_file(&repo, "f.txt", "x", "fix: carry metadata")?;

        let commits = repo.commits_between(&base, "HEAD")?;
        assert_eq!(commits[0].raw.author_name, "Test");
        assert_eq!(commits[0].raw.author_email, "test@example.com");
        assert_eq!(commits[0].raw.hash.len(), 40);
        Ok(())
    }
}
