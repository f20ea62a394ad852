use std::sync::LazyLock;

use regex::Regex;

/// One historical heading convention for a version section. Dialects
/// are tried in order during parsing; the first match wins for a given
/// line.
pub trait ChangelogDialect: Sync {
    fn name(&self) -> &'static str;

    /// The version string when `line` is a version heading in this
    /// dialect.
    fn parse_heading(&self, line: &str) -> Option<String>;
}

/// `## 1.2.3 (2024-05-01)` or `## [1.2.3](compare-url) (2024-05-01)`,
/// optionally wrapped in `<small>` tags.
pub struct ReleaseHeaderDialect;

static RELEASE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^##\s+(?:<small>\s*)?\[?(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\]?(?:\([^)\s]*\))?\s+\(\d{4}-\d{2}-\d{2}\)\s*(?:</small>)?\s*$",
    )
    .expect("valid release heading regex")
});

impl ChangelogDialect for ReleaseHeaderDialect {
    fn name(&self) -> &'static str {
        "release-header"
    }

    fn parse_heading(&self, line: &str) -> Option<String> {
        RELEASE_HEADING_RE
            .captures(line)
            .map(|caps| caps["version"].to_string())
    }
}

/// Bare `## 1.2.3` headings without a date, as written by changesets.
pub struct ChangesetsDialect;

static CHANGESETS_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^##\s+\[?(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\]?\s*$",
    )
    .expect("valid changesets heading regex")
});

impl ChangelogDialect for ChangesetsDialect {
    fn name(&self) -> &'static str {
        "changesets"
    }

    fn parse_heading(&self, line: &str) -> Option<String> {
        CHANGESETS_HEADING_RE
            .captures(line)
            .map(|caps| caps["version"].to_string())
    }
}

/// Dialects in preference order.
#[must_use]
pub fn default_dialects() -> Vec<Box<dyn ChangelogDialect>> {
    vec![Box::new(ReleaseHeaderDialect), Box::new(ChangesetsDialect)]
}
