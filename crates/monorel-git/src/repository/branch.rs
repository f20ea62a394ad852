use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] when HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;
        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }
        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// The branch releases are cut against: `origin/HEAD` when the
    /// remote advertises one, otherwise the first of `main`/`master`
    /// that exists, otherwise the current branch.
    ///
    /// # Errors
    ///
    /// Returns an error when no branch can be determined at all.
    pub fn default_branch(&self) -> Result<String> {
        if let Ok(reference) = self.inner.find_reference("refs/remotes/origin/HEAD") {
            if let Some(target) = reference.symbolic_target() {
                if let Some(branch) = target.strip_prefix("refs/remotes/origin/") {
                    return Ok(branch.to_string());
                }
            }
        }

        for candidate in ["main", "master"] {
            if self
                .inner
                .find_branch(candidate, git2::BranchType::Local)
                .is_ok()
            {
                return Ok(candidate.to_string());
            }
        }

        self.current_branch()
    }

    /// Object id of the merge base of two refs.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if either ref cannot be
    /// resolved.
    pub fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        let a_commit = self.resolve_commit(a)?;
        let b_commit = self.resolve_commit(b)?;
        let base = self.inner.merge_base(a_commit.id(), b_commit.id())?;
        Ok(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_repo;
    use crate::GitError;

    #[test]
    fn current_branch_after_init() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let branch = repo.current_branch()?;
        assert!(branch == "main" || branch == "master", "got {branch}");
        Ok(())
    }

    #[test]
    fn default_branch_falls_back_to_local_main_or_master() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        assert_eq!(repo.default_branch()?, repo.current_branch()?);
        Ok(())
    }

    #[test]
    fn detached_head_is_reported() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let head = repo.inner.head()?.peel_to_commit()?;
        repo.inner.set_head_detached(head.id())?;

        let result = repo.current_branch();
        assert!(matches!(result, Err(GitError::DetachedHead)));
        Ok(())
    }

    #[test]
    fn merge_base_of_a_ref_with_itself() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let head = repo.inner.head()?.peel_to_commit()?;
        assert_eq!(repo.merge_base("HEAD", "HEAD")?, head.id().to_string());
        Ok(())
    }
}
