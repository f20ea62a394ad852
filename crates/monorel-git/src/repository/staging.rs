use std::path::Path;

use crate::Result;

use super::Repository;

impl Repository {
    /// Stages the given files, handling deletions as removals.
    ///
    /// # Errors
    ///
    /// Returns an error if staging any of the files fails.
    pub fn stage_files(&self, paths: &[&Path]) -> Result<()> {
        let mut index = self.inner.index()?;

        for path in paths {
            let relative_path = self.to_relative_path(path);

            if path.exists() || self.root().join(&relative_path).exists() {
                index.add_path(&relative_path)?;
            } else {
                index.remove_path(&relative_path)?;
            }
        }

        index.write()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::super::tests::setup_test_repo;

    #[test]
    fn stage_multiple_files() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;

        fs::write(dir.path().join("package.json"), "{}")?;
        fs::write(dir.path().join("CHANGELOG.md"), "# a\n")?;

        repo.stage_files(&[Path::new("package.json"), Path::new("CHANGELOG.md")])?;

        let index = repo.inner.index()?;
        assert!(index.get_path(Path::new("package.json"), 0).is_some());
        assert!(index.get_path(Path::new("CHANGELOG.md"), 0).is_some());
        Ok(())
    }
}
