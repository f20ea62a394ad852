use crate::Result;

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the remote lookup fails.
    pub fn remote_url(&self) -> Result<Option<String>> {
        let Ok(remote) = self.inner.find_remote("origin") else {
            return Ok(None);
        };

        Ok(remote.url().map(String::from))
    }

    /// Pushes `branch` to origin using the ambient credential helpers.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails or origin does not exist.
    pub fn push(&self, branch: &str) -> Result<()> {
        let mut remote = self.inner.find_remote("origin")?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|url, username, _allowed| {
            git2::Cred::credential_helper(&self.inner.config()?, url, username)
        });
        let mut options = git2::PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[refspec.as_str()], Some(&mut options))?;
        Ok(())
    }
}
