use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::commit::{Commit, CommitAuthor, CommitReference, CommitType, ReferenceKind};

static CONVENTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^)]+)\))?(?P<breaking>!)?:\s+(?P<description>.+)$")
        .expect("valid conventional commit regex")
});

static PULL_REQUEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(?P<number>\d+)\)").expect("valid pull request regex"));

static ISSUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^(])#(?P<number>\d+)").expect("valid issue regex"));

static CO_AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^Co-authored-by:\s*(?P<name>[^<]+?)\s*<(?P<email>[^>]*)>")
        .expect("valid co-author regex")
});

/// A commit as read from the version-control adapter, before any
/// interpretation of its message.
#[derive(Debug, Clone)]
pub struct RawCommit {
    pub hash: String,
    pub summary: String,
    pub body: String,
    pub author_name: String,
    pub author_email: String,
    pub date: DateTime<Utc>,
}

/// Interprets a raw commit's message against the conventional-commit
/// grammar. Non-conventional messages still yield a `Commit`, with
/// `is_conventional: false` and the whole summary as description.
#[must_use]
pub fn parse_commit(raw: &RawCommit) -> Commit {
    let short_hash = raw.hash.chars().take(7).collect();
    let references = extract_references(&raw.summary);
    let authors = extract_authors(raw);
    let breaking_footer = has_breaking_footer(&raw.body);

    match CONVENTIONAL_RE.captures(&raw.summary) {
        Some(caps) => {
            let commit_type = CommitType::parse(&caps["type"]);
            let scope = caps.name("scope").map(|m| m.as_str().to_string());
            let description = strip_reference_suffix(&caps["description"]);
            let is_breaking = caps.name("breaking").is_some() || breaking_footer;

            Commit {
                hash: raw.hash.clone(),
                short_hash,
                message: raw.summary.clone(),
                commit_type: Some(commit_type),
                scope,
                description,
                is_conventional: true,
                is_breaking,
                references,
                authors,
                date: raw.date,
            }
        }
        None => Commit {
            hash: raw.hash.clone(),
            short_hash,
            message: raw.summary.clone(),
            commit_type: None,
            scope: None,
            description: strip_reference_suffix(&raw.summary),
            is_conventional: false,
            is_breaking: breaking_footer,
            references,
            authors,
            date: raw.date,
        },
    }
}

fn has_breaking_footer(body: &str) -> bool {
    body.lines().any(|line| {
        line.starts_with("BREAKING CHANGE:") || line.starts_with("BREAKING-CHANGE:")
    })
}

fn extract_references(summary: &str) -> Vec<CommitReference> {
    let mut references = Vec::new();

    for caps in PULL_REQUEST_RE.captures_iter(summary) {
        references.push(CommitReference {
            kind: ReferenceKind::PullRequest,
            value: caps["number"].to_string(),
        });
    }

    for caps in ISSUE_RE.captures_iter(summary) {
        let value = caps["number"].to_string();
        if !references.iter().any(|r| r.value == value) {
            references.push(CommitReference {
                kind: ReferenceKind::Issue,
                value,
            });
        }
    }

    references
}

fn extract_authors(raw: &RawCommit) -> Vec<CommitAuthor> {
    let mut authors = vec![CommitAuthor {
        name: raw.author_name.clone(),
        email: raw.author_email.clone(),
        profile: profile_from_email(&raw.author_email),
    }];

    for caps in CO_AUTHOR_RE.captures_iter(&raw.body) {
        let email = caps["email"].to_string();
        if authors.iter().any(|a| a.email == email) {
            continue;
        }
        authors.push(CommitAuthor {
            name: caps["name"].to_string(),
            profile: profile_from_email(&email),
            email,
        });
    }

    authors
}

// GitHub noreply addresses encode the login: "12345+login@users.noreply.github.com".
fn profile_from_email(email: &str) -> Option<String> {
    let local = email.strip_suffix("@users.noreply.github.com")?;
    let login = local.rsplit_once('+').map_or(local, |(_, l)| l);
    (!login.is_empty()).then(|| login.to_string())
}

fn strip_reference_suffix(description: &str) -> String {
    let mut out = description.trim().to_string();
    while let Some(caps) = PULL_REQUEST_RE.captures(&out) {
        let whole = caps.get(0).map(|m| (m.start(), m.end()));
        match whole {
            Some((start, end)) if end == out.len() => {
                out.truncate(start);
                out = out.trim_end().to_string();
            }
            _ => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(summary: &str) -> RawCommit {
        RawCommit {
            hash: "0123456789abcdef0123456789abcdef01234567".to_string(),
            summary: summary.to_string(),
            body: String::new(),
            author_name: "Test Author".to_string(),
            author_email: "author@example.com".to_string(),
            date: Utc::now(),
        }
    }

    #[test]
    fn parses_simple_feat() {
        let commit = parse_commit(&raw("feat: add streaming output"));
        assert!(commit.is_conventional);
        assert_eq!(commit.commit_type, Some(CommitType::Feat));
        assert_eq!(commit.description, "add streaming output");
        assert!(!commit.is_breaking);
        assert_eq!(commit.short_hash, "0123456");
    }

    #[test]
    fn parses_scope_and_breaking_marker() {
        let commit = parse_commit(&raw("refactor(core)!: drop legacy config"));
        assert_eq!(commit.commit_type, Some(CommitType::Refactor));
        assert_eq!(commit.scope.as_deref(), Some("core"));
        assert!(commit.is_breaking);
    }

    #[test]
    fn breaking_footer_marks_commit_breaking() {
        let mut r = raw("feat: new wire format");
        r.body = "Longer explanation.\n\nBREAKING CHANGE: frames are length-prefixed now".to_string();
        let commit = parse_commit(&r);
        assert!(commit.is_breaking);
    }

    #[test]
    fn non_conventional_message_is_kept() {
        let commit = parse_commit(&raw("Update readme"));
        assert!(!commit.is_conventional);
        assert_eq!(commit.commit_type, None);
        assert_eq!(commit.description, "Update readme");
    }

    #[test]
    fn pull_request_suffix_becomes_reference() {
        let commit = parse_commit(&raw("fix: handle empty manifest (#482)"));
        assert_eq!(commit.references.len(), 1);
        assert_eq!(commit.references[0].kind, ReferenceKind::PullRequest);
        assert_eq!(commit.references[0].value, "482");
        assert_eq!(commit.description, "handle empty manifest");
    }

    #[test]
    fn bare_issue_number_becomes_issue_reference() {
        let commit = parse_commit(&raw("fix: avoid panic on #91"));
        assert_eq!(commit.references[0].kind, ReferenceKind::Issue);
        assert_eq!(commit.references[0].value, "91");
    }

    #[test]
    fn co_authors_are_collected_once() {
        let mut r = raw("feat: shared work");
        r.body = "Co-authored-by: Pair One <one@example.com>\n\
                  Co-authored-by: Pair One <one@example.com>\n\
                  Co-authored-by: Pair Two <4242+pairtwo@users.noreply.github.com>"
            .to_string();
        let commit = parse_commit(&r);
        assert_eq!(commit.authors.len(), 3);
        assert_eq!(commit.authors[1].name, "Pair One");
        assert_eq!(commit.authors[2].profile.as_deref(), Some("pairtwo"));
    }

    #[test]
    fn feature_alias_parses_as_feat() {
        let commit = parse_commit(&raw("feature: alias support"));
        assert_eq!(commit.commit_type, Some(CommitType::Feat));
    }
}
