use std::fmt::Write as _;

use monorel_core::{ChangeKind, PackageRelease};

/// Human-readable plan listing, one line per release.
pub fn render_plan(releases: &[PackageRelease]) -> String {
    if releases.is_empty() {
        return String::from("Nothing to release.\n");
    }

    let mut out = String::new();
    for release in releases {
        let note = match release.change_kind {
            ChangeKind::AsIs => " [as-is]",
            ChangeKind::Manual => " [manual]",
            ChangeKind::Auto if !release.has_direct_changes => " [dependency bump]",
            ChangeKind::Auto => "",
        };
        let _ = writeln!(
            out,
            "{}: {} -> {} ({}){note}",
            release.package, release.current_version, release.new_version, release.bump_type,
        );
    }
    out
}

/// Markdown table suitable for a pull-request body.
pub fn render_pr_summary(releases: &[PackageRelease]) -> String {
    let mut out = String::from("| package | from | to | bump |\n| --- | --- | --- | --- |\n");
    for release in releases {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            release.package, release.current_version, release.new_version, release.bump_type,
        );
    }
    out
}
