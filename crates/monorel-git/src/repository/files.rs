use std::path::Path;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Content of `path` at `refspec`, `None` when the path does not
    /// exist at that ref. This is how callers distinguish a draft state
    /// (changelog absent on the target branch) from a published one.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] for an unresolvable ref and
    /// [`GitError::NonUtf8File`] for binary content.
    pub fn file_at_ref(&self, refspec: &str, path: &Path) -> Result<Option<String>> {
        let commit = self.resolve_commit(refspec)?;
        let tree = commit.tree()?;
        let relative = self.to_relative_path(path);

        let Ok(entry) = tree.get_path(&relative) else {
            return Ok(None);
        };
        let Some(blob) = entry
            .to_object(&self.inner)?
            .into_blob()
            .ok()
        else {
            return Ok(None);
        };

        let content =
            std::str::from_utf8(blob.content()).map_err(|_| GitError::NonUtf8File {
                refspec: refspec.to_string(),
                path: relative.clone(),
            })?;
        Ok(Some(content.to_string()))
    }
}
