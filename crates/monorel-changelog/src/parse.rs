use crate::dialect::{default_dialects, ChangelogDialect};

/// One version section, kept verbatim so untouched blocks survive a
/// merge byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBlock {
    pub version: String,
    /// Heading line through the line before the next heading, verbatim.
    pub raw_block: String,
    pub start_line: usize,
    /// Exclusive.
    pub end_line: usize,
}

/// Structural parse of a changelog document. `to_document` on an
/// unmodified parse reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChangelog {
    /// The `# <package>` title when the document has one.
    pub package_name: Option<String>,
    /// Everything before the first version heading, verbatim.
    pub header: String,
    pub versions: Vec<VersionBlock>,
}

impl ParsedChangelog {
    #[must_use]
    pub fn parse(document: &str) -> Self {
        Self::parse_with(document, &default_dialects())
    }

    #[must_use]
    pub fn parse_with(document: &str, dialects: &[Box<dyn ChangelogDialect>]) -> Self {
        let lines: Vec<&str> = document.split_inclusive('\n').collect();

        let mut headings: Vec<(usize, String)> = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if let Some(version) = dialects
                .iter()
                .find_map(|dialect| dialect.parse_heading(trimmed))
            {
                headings.push((idx, version));
            }
        }

        let header_end = headings.first().map_or(lines.len(), |(idx, _)| *idx);
        let header: String = lines[..header_end].concat();
        let package_name = lines[..header_end].iter().find_map(|line| {
            let trimmed = line.trim_end();
            trimmed
                .strip_prefix("# ")
                .map(|name| name.trim().to_string())
        });

        let versions = headings
            .iter()
            .enumerate()
            .map(|(i, (start, version))| {
                let end = headings.get(i + 1).map_or(lines.len(), |(next, _)| *next);
                VersionBlock {
                    version: version.clone(),
                    raw_block: lines[*start..end].concat(),
                    start_line: *start,
                    end_line: end,
                }
            })
            .collect();

        Self {
            package_name,
            header,
            versions,
        }
    }

    #[must_use]
    pub fn find_version(&self, version: &str) -> Option<&VersionBlock> {
        self.versions.iter().find(|block| block.version == version)
    }

    #[must_use]
    pub fn to_document(&self) -> String {
        let mut document = self.header.clone();
        for block in &self.versions {
            document.push_str(&block.raw_block);
        }
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "\
# @scope/a

## [1.1.0](https://github.com/acme/widgets/compare/v1.0.1...v1.1.0) (2024-05-01)

### Features

- add things ([abc1234](https://github.com/acme/widgets/commit/abc1234))

## 1.0.1

### Patch Changes

- fix things

## 1.0.0 (2024-01-01)

- initial release
";

    #[test]
    fn round_trips_byte_for_byte() {
        let parsed = ParsedChangelog::parse(MIXED);
        assert_eq!(parsed.to_document(), MIXED);
    }

    #[test]
    fn recognizes_both_dialects_in_one_document() {
        let parsed = ParsedChangelog::parse(MIXED);
        let versions: Vec<_> = parsed.versions.iter().map(|b| b.version.as_str()).collect();
        assert_eq!(versions, ["1.1.0", "1.0.1", "1.0.0"]);
    }

    #[test]
    fn captures_the_package_title_outside_blocks() {
        let parsed = ParsedChangelog::parse(MIXED);
        assert_eq!(parsed.package_name.as_deref(), Some("@scope/a"));
        assert!(parsed.header.starts_with("# @scope/a"));
        assert!(!parsed.versions[0].raw_block.contains("@scope/a"));
    }

    #[test]
    fn blocks_carry_line_offsets() {
        let parsed = ParsedChangelog::parse(MIXED);
        assert_eq!(parsed.versions[0].start_line, 2);
        assert_eq!(parsed.versions[0].end_line, parsed.versions[1].start_line);
    }

    #[test]
    fn header_only_document_has_no_versions() {
        let parsed = ParsedChangelog::parse("# @scope/a\n\nNothing released yet.\n");
        assert!(parsed.versions.is_empty());
        assert_eq!(parsed.package_name.as_deref(), Some("@scope/a"));
        assert_eq!(parsed.to_document(), "# @scope/a\n\nNothing released yet.\n");
    }

    #[test]
    fn document_without_trailing_newline_round_trips() {
        let doc = "# a\n\n## 1.0.0\n\n- first";
        let parsed = ParsedChangelog::parse(doc);
        assert_eq!(parsed.to_document(), doc);
    }
}
