use chrono::NaiveDate;
use indexmap::IndexMap;
use monorel_commit::{Commit, CommitType, ReferenceKind};
use semver::Version;

use crate::forge::RepositoryInfo;

/// Fixed section order; anything not matched falls into the last slot.
const CATEGORY_ORDER: [&str; 12] = [
    "Breaking Changes",
    "Features",
    "Bug Fixes",
    "Performance Improvements",
    "Reverts",
    "Documentation",
    "Code Refactoring",
    "Tests",
    "Build System",
    "Continuous Integration",
    "Chores",
    "Miscellaneous",
];

/// Inputs for rendering one version's changelog fragment.
#[derive(Debug)]
pub struct ReleaseContext<'a> {
    pub version: &'a Version,
    pub previous_version: Option<&'a Version>,
    pub date: NaiveDate,
    pub commits: &'a [Commit],
    pub repository: Option<&'a RepositoryInfo>,
    pub author_credit: bool,
}

/// Renders a markdown fragment starting with a `## <version> (<date>)`
/// heading, grouped by category in fixed order, one line per commit.
#[must_use]
pub fn render(ctx: &ReleaseContext<'_>) -> String {
    let mut sections: IndexMap<&'static str, Vec<String>> = IndexMap::new();
    for category in CATEGORY_ORDER {
        sections.insert(category, Vec::new());
    }
    for commit in ctx.commits {
        if let Some(lines) = sections.get_mut(category(commit)) {
            lines.push(commit_line(commit, ctx));
        }
    }

    let mut out = heading(ctx);
    out.push('\n');
    for (label, lines) in &sections {
        if lines.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str("### ");
        out.push_str(label);
        out.push_str("\n\n");
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn heading(ctx: &ReleaseContext<'_>) -> String {
    match (ctx.repository, ctx.previous_version) {
        (Some(repository), Some(previous)) => {
            let compare =
                repository.comparison_url(&format!("v{previous}"), &format!("v{}", ctx.version));
            format!("## [{}]({compare}) ({})", ctx.version, ctx.date)
        }
        _ => format!("## {} ({})", ctx.version, ctx.date),
    }
}

fn category(commit: &Commit) -> &'static str {
    if commit.is_breaking {
        return "Breaking Changes";
    }
    if !commit.is_conventional {
        return "Miscellaneous";
    }
    match &commit.commit_type {
        Some(CommitType::Feat) => "Features",
        Some(CommitType::Fix) => "Bug Fixes",
        Some(CommitType::Perf) => "Performance Improvements",
        Some(CommitType::Revert) => "Reverts",
        Some(CommitType::Docs) => "Documentation",
        Some(CommitType::Refactor) => "Code Refactoring",
        Some(CommitType::Test) => "Tests",
        Some(CommitType::Build) => "Build System",
        Some(CommitType::Ci) => "Continuous Integration",
        Some(CommitType::Chore | CommitType::Style) => "Chores",
        Some(CommitType::Other(_)) | None => "Miscellaneous",
    }
}

fn commit_line(commit: &Commit, ctx: &ReleaseContext<'_>) -> String {
    let mut line = format!("- {}", commit.description);

    for reference in &commit.references {
        let marker = format!("#{}", reference.value);
        match (ctx.repository, reference.kind) {
            (Some(repository), ReferenceKind::PullRequest) => {
                line.push_str(&format!(
                    " ([{marker}]({}))",
                    repository.pull_request_url(&reference.value)
                ));
            }
            (Some(repository), ReferenceKind::Issue) => {
                line.push_str(&format!(
                    " ([{marker}]({}))",
                    repository.issue_url(&reference.value)
                ));
            }
            (None, _) => line.push_str(&format!(" ({marker})")),
        }
    }

    match ctx.repository {
        Some(repository) => line.push_str(&format!(
            " ([{}]({}))",
            commit.short_hash,
            repository.commit_url(&commit.hash)
        )),
        None => line.push_str(&format!(" ({})", commit.short_hash)),
    }

    if ctx.author_credit {
        if let Some(author) = commit.authors.first() {
            match &author.profile {
                Some(login) => line.push_str(&format!(
                    " (by [@{login}](https://github.com/{login}))"
                )),
                None => line.push_str(&format!(" (by {})", author.name)),
            }
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use monorel_commit::{CommitAuthor, CommitReference};

    use super::*;

    fn commit(commit_type: Option<CommitType>, description: &str, breaking: bool) -> Commit {
        Commit {
            hash: "0123456789abcdef".to_string(),
            short_hash: "0123456".to_string(),
            message: description.to_string(),
            is_conventional: commit_type.is_some(),
            commit_type,
            scope: None,
            description: description.to_string(),
            is_breaking: breaking,
            references: Vec::new(),
            authors: Vec::new(),
            date: Utc::now(),
        }
    }

    fn context<'a>(version: &'a Version, commits: &'a [Commit]) -> ReleaseContext<'a> {
        ReleaseContext {
            version,
            previous_version: None,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            commits,
            repository: None,
            author_credit: false,
        }
    }

    #[test]
    fn groups_by_category_in_fixed_order() {
        let version = Version::new(1, 1, 0);
        let commits = [
            commit(Some(CommitType::Fix), "handle empty input", false),
            commit(Some(CommitType::Feat), "add export", false),
            commit(Some(CommitType::Feat), "drop legacy flag", true),
        ];
        let fragment = render(&context(&version, &commits));

        let breaking = fragment.find("### Breaking Changes").expect("present");
        let features = fragment.find("### Features").expect("present");
        let fixes = fragment.find("### Bug Fixes").expect("present");
        assert!(breaking < features && features < fixes);
        assert!(fragment.starts_with("## 1.1.0 (2024-05-01)\n"));
    }

    #[test]
    fn unknown_types_land_in_miscellaneous() {
        let version = Version::new(1, 0, 1);
        let commits = [
            commit(Some(CommitType::Other("wip".to_string())), "tinker", false),
            commit(None, "free-form message", false),
        ];
        let fragment = render(&context(&version, &commits));

        assert!(fragment.contains("### Miscellaneous"));
        assert!(fragment.contains("- tinker"));
        assert!(fragment.contains("- free-form message"));
    }

    #[test]
    fn links_resolve_against_the_repository() {
        let repository =
            RepositoryInfo::from_url("https://github.com/acme/widgets").expect("valid url");
        let version = Version::new(1, 1, 0);
        let previous = Version::new(1, 0, 0);
        let mut fix = commit(Some(CommitType::Fix), "handle empty input", false);
        fix.references.push(CommitReference {
            kind: ReferenceKind::PullRequest,
            value: "42".to_string(),
        });
        let commits = [fix];

        let ctx = ReleaseContext {
            version: &version,
            previous_version: Some(&previous),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            commits: &commits,
            repository: Some(&repository),
            author_credit: false,
        };
        let fragment = render(&ctx);

        assert!(fragment.starts_with(
            "## [1.1.0](https://github.com/acme/widgets/compare/v1.0.0...v1.1.0) (2024-05-01)"
        ));
        assert!(fragment.contains("([#42](https://github.com/acme/widgets/pull/42))"));
        assert!(fragment
            .contains("([0123456](https://github.com/acme/widgets/commit/0123456789abcdef))"));
    }

    #[test]
    fn author_credit_prefers_the_profile() {
        let version = Version::new(1, 0, 1);
        let mut fix = commit(Some(CommitType::Fix), "handle empty input", false);
        fix.authors.push(CommitAuthor {
            name: "Ada".to_string(),
            email: "1+ada@users.noreply.github.com".to_string(),
            profile: Some("ada".to_string()),
        });
        let commits = [fix];

        let mut ctx = context(&version, &commits);
        ctx.author_credit = true;
        let fragment = render(&ctx);

        assert!(fragment.contains("(by [@ada](https://github.com/ada))"));
    }

    #[test]
    fn rendered_fragment_parses_as_one_block() {
        let version = Version::new(1, 1, 0);
        let commits = [commit(Some(CommitType::Feat), "add export", false)];
        let fragment = render(&context(&version, &commits));

        let parsed = crate::parse::ParsedChangelog::parse(&fragment);
        assert_eq!(parsed.versions.len(), 1);
        assert_eq!(parsed.versions[0].version, "1.1.0");
    }
}
