use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conventional-commit type tag.
///
/// A closed set with an `Other` fallback: a new conventional type that
/// this tool has never heard of still parses and lands in the
/// "Miscellaneous" changelog bucket instead of matching nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommitType {
    Feat,
    Fix,
    Perf,
    Chore,
    Docs,
    Style,
    Refactor,
    Test,
    Build,
    Ci,
    Revert,
    Other(String),
}

impl CommitType {
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "feat" | "feature" => Self::Feat,
            "fix" => Self::Fix,
            "perf" => Self::Perf,
            "chore" => Self::Chore,
            "docs" => Self::Docs,
            "style" => Self::Style,
            "refactor" => Self::Refactor,
            "test" => Self::Test,
            "build" => Self::Build,
            "ci" => Self::Ci,
            "revert" => Self::Revert,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Perf => "perf",
            Self::Chore => "chore",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Test => "test",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Revert => "revert",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for CommitType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<CommitType> for String {
    fn from(t: CommitType) -> Self {
        t.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    Issue,
    PullRequest,
}

/// An issue or pull-request number mentioned by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReference {
    pub kind: ReferenceKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// A parsed commit. Produced once by the commit source and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub commit_type: Option<CommitType>,
    pub scope: Option<String>,
    pub description: String,
    pub is_conventional: bool,
    pub is_breaking: bool,
    pub references: Vec<CommitReference>,
    pub authors: Vec<CommitAuthor>,
    pub date: DateTime<Utc>,
}
