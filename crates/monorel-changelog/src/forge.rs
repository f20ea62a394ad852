use url::Url;

use crate::error::ChangelogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    GitHub,
    GitLab,
    Bitbucket,
    Gitea,
}

/// Owner/repo coordinates parsed from the configured repository URL,
/// used to resolve commit, issue and pull-request links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub forge: Forge,
    pub owner: String,
    pub repo: String,
    base_url: Url,
}

impl RepositoryInfo {
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` for an invalid URL and
    /// `InvalidRepositoryPath` when the path has no owner/repo
    /// segments.
    pub fn from_url(url_str: &str) -> Result<Self, ChangelogError> {
        let url = Url::parse(url_str).map_err(|source| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ChangelogError::UrlParse {
            url: url_str.to_string(),
            source: url::ParseError::EmptyHost,
        })?;

        let path = url.path().trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return Err(ChangelogError::InvalidRepositoryPath {
                url: url_str.to_string(),
            });
        }

        let base_url =
            Url::parse(&format!("{}://{host}", url.scheme())).map_err(|source| {
                ChangelogError::UrlParse {
                    url: url_str.to_string(),
                    source,
                }
            })?;

        Ok(Self {
            forge: detect_forge(host),
            owner: segments[0].to_string(),
            repo: segments[1].to_string(),
            base_url,
        })
    }

    fn project_url(&self) -> String {
        format!("{}{}/{}", self.base_url, self.owner, self.repo)
    }

    #[must_use]
    pub fn commit_url(&self, hash: &str) -> String {
        match self.forge {
            Forge::GitHub | Forge::Gitea => format!("{}/commit/{hash}", self.project_url()),
            Forge::GitLab => format!("{}/-/commit/{hash}", self.project_url()),
            Forge::Bitbucket => format!("{}/commits/{hash}", self.project_url()),
        }
    }

    #[must_use]
    pub fn issue_url(&self, number: &str) -> String {
        match self.forge {
            Forge::GitHub | Forge::Gitea | Forge::Bitbucket => {
                format!("{}/issues/{number}", self.project_url())
            }
            Forge::GitLab => format!("{}/-/issues/{number}", self.project_url()),
        }
    }

    #[must_use]
    pub fn pull_request_url(&self, number: &str) -> String {
        match self.forge {
            Forge::GitHub => format!("{}/pull/{number}", self.project_url()),
            Forge::Gitea => format!("{}/pulls/{number}", self.project_url()),
            Forge::GitLab => format!("{}/-/merge_requests/{number}", self.project_url()),
            Forge::Bitbucket => format!("{}/pull-requests/{number}", self.project_url()),
        }
    }

    #[must_use]
    pub fn comparison_url(&self, base_tag: &str, target_tag: &str) -> String {
        match self.forge {
            Forge::GitHub | Forge::Gitea => {
                format!("{}/compare/{base_tag}...{target_tag}", self.project_url())
            }
            Forge::GitLab => format!(
                "{}/-/compare/{base_tag}...{target_tag}",
                self.project_url()
            ),
            Forge::Bitbucket => format!(
                "{}/branches/compare/{target_tag}..{base_tag}",
                self.project_url()
            ),
        }
    }
}

fn detect_forge(host: &str) -> Forge {
    let host = host.to_lowercase();

    if host == "gitlab.com" || host.starts_with("gitlab.") || host.contains(".gitlab.") {
        Forge::GitLab
    } else if host == "bitbucket.org" || host.ends_with(".bitbucket.org") {
        Forge::Bitbucket
    } else if host == "codeberg.org" || host.starts_with("gitea.") {
        Forge::Gitea
    } else {
        Forge::GitHub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_github_url() {
        let info = RepositoryInfo::from_url("https://github.com/acme/widgets").expect("parses");
        assert_eq!(info.forge, Forge::GitHub);
        assert_eq!(info.owner, "acme");
        assert_eq!(info.repo, "widgets");
    }

    #[test]
    fn strips_git_suffix() {
        let info = RepositoryInfo::from_url("https://github.com/acme/widgets.git").expect("parses");
        assert_eq!(info.repo, "widgets");
    }

    #[test]
    fn github_link_shapes() {
        let info = RepositoryInfo::from_url("https://github.com/acme/widgets").expect("parses");
        assert_eq!(
            info.commit_url("abc1234"),
            "https://github.com/acme/widgets/commit/abc1234"
        );
        assert_eq!(
            info.pull_request_url("42"),
            "https://github.com/acme/widgets/pull/42"
        );
        assert_eq!(
            info.issue_url("7"),
            "https://github.com/acme/widgets/issues/7"
        );
        assert_eq!(
            info.comparison_url("v1.0.0", "v1.1.0"),
            "https://github.com/acme/widgets/compare/v1.0.0...v1.1.0"
        );
    }

    #[test]
    fn gitlab_links_use_dash_namespace() {
        let info = RepositoryInfo::from_url("https://gitlab.com/acme/widgets").expect("parses");
        assert_eq!(
            info.commit_url("abc1234"),
            "https://gitlab.com/acme/widgets/-/commit/abc1234"
        );
        assert_eq!(
            info.pull_request_url("42"),
            "https://gitlab.com/acme/widgets/-/merge_requests/42"
        );
    }

    #[test]
    fn self_hosted_gitlab_is_detected() {
        let info =
            RepositoryInfo::from_url("https://gitlab.mycompany.com/team/project").expect("parses");
        assert_eq!(info.forge, Forge::GitLab);
    }

    #[test]
    fn unknown_host_defaults_to_github_shapes() {
        let info = RepositoryInfo::from_url("https://example.com/acme/widgets").expect("parses");
        assert_eq!(info.forge, Forge::GitHub);
    }

    #[test]
    fn rejects_url_without_repo_path() {
        let result = RepositoryInfo::from_url("https://github.com/acme");
        assert!(matches!(
            result,
            Err(ChangelogError::InvalidRepositoryPath { .. })
        ));
    }
}
