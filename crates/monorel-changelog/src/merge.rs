use indexmap::IndexMap;

use crate::error::ChangelogError;
use crate::parse::ParsedChangelog;

/// Merges a rendered version fragment into an existing document.
///
/// A missing document is created with a `# <package>` title. A new
/// version is inserted directly below the header, above every existing
/// block. When the document already contains the version, that block is
/// replaced by the section-aware union of the old and new lines, so a
/// release branch that gains commits converges to a single block. Every
/// other block is carried over byte for byte, trailing whitespace and
/// all.
///
/// # Errors
///
/// Returns `ChangelogError::UnparsableEntry` when `rendered` does not
/// start with a recognizable version heading.
pub fn merge(
    existing: Option<&str>,
    rendered: &str,
    package_name: &str,
) -> Result<String, ChangelogError> {
    let fragment = ParsedChangelog::parse(rendered);
    let new_block = fragment
        .versions
        .first()
        .ok_or(ChangelogError::UnparsableEntry)?;

    let existing = existing.filter(|content| !content.trim().is_empty());
    let Some(existing) = existing else {
        return Ok(format!(
            "# {package_name}\n\n{}\n",
            new_block.raw_block.trim_end()
        ));
    };

    let parsed = ParsedChangelog::parse(existing);
    let mut document = normalize_header(&parsed, package_name);

    let replace_at = parsed
        .versions
        .iter()
        .position(|block| block.version == new_block.version);

    // Whitespace is normalized only around the one block this merge
    // produces; every other block is emitted verbatim.
    match replace_at {
        Some(index) => {
            for (i, block) in parsed.versions.iter().enumerate() {
                if i == index {
                    let unioned = union_block(&block.raw_block, &new_block.raw_block);
                    push_normalized(&mut document, &unioned, i + 1 == parsed.versions.len());
                } else {
                    document.push_str(&block.raw_block);
                }
            }
        }
        None => {
            push_normalized(&mut document, &new_block.raw_block, parsed.versions.is_empty());
            for block in &parsed.versions {
                document.push_str(&block.raw_block);
            }
        }
    }

    Ok(document)
}

fn push_normalized(document: &mut String, block: &str, is_last: bool) {
    document.push_str(block.trim_end());
    document.push('\n');
    if !is_last {
        document.push('\n');
    }
}

/// The existing header when present, else a fresh `# <package>` title.
/// The single normalized whitespace point: the header always ends with
/// one blank line before the first block.
fn normalize_header(parsed: &ParsedChangelog, package_name: &str) -> String {
    if parsed.header.trim().is_empty() {
        format!("# {package_name}\n\n")
    } else {
        format!("{}\n\n", parsed.header.trim_end())
    }
}

/// Section-aware union of two blocks for the same version. The new
/// block supplies the heading and section order; lines present in the
/// old block but not the new one are appended to their section.
fn union_block(old_raw: &str, new_raw: &str) -> String {
    let heading = new_raw.lines().next().unwrap_or_default();
    let new_sections = split_sections(new_raw);
    let old_sections = split_sections(old_raw);

    let mut merged: IndexMap<String, Vec<String>> = IndexMap::new();
    for (section, lines) in new_sections {
        merged.insert(section, lines);
    }
    for (section, lines) in old_sections {
        let entry = merged.entry(section).or_default();
        for line in lines {
            if !entry.contains(&line) {
                entry.push(line);
            }
        }
    }

    let mut out = heading.to_string();
    out.push('\n');
    for (section, lines) in &merged {
        if lines.is_empty() {
            continue;
        }
        out.push('\n');
        if !section.is_empty() {
            out.push_str(section);
            out.push_str("\n\n");
        }
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Content lines grouped by their `### ` section; lines before any
/// section land under the empty key. The version heading itself is
/// skipped.
fn split_sections(raw: &str) -> IndexMap<String, Vec<String>> {
    let mut sections: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut current = String::new();

    for line in raw.lines().skip(1) {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("### ") {
            current = trimmed.to_string();
            sections.entry(current.clone()).or_default();
        } else {
            sections.entry(current.clone()).or_default().push(trimmed.to_string());
        }
    }

    sections
}
