use monorel_core::BumpKind;

use crate::commit::{Commit, CommitType};

/// Maps one commit to a bump severity. Pure function of the record.
#[must_use]
pub fn classify(commit: &Commit) -> BumpKind {
    if !commit.is_conventional {
        return BumpKind::None;
    }
    if commit.is_breaking {
        return BumpKind::Major;
    }
    match commit.commit_type {
        Some(CommitType::Feat) => BumpKind::Minor,
        Some(CommitType::Fix | CommitType::Perf) => BumpKind::Patch,
        _ => BumpKind::None,
    }
}

/// Folds a commit sequence to its highest severity. Short-circuits once
/// a breaking commit forces `Major`; the result is the same either way.
#[must_use]
pub fn aggregate<'a, I>(commits: I) -> BumpKind
where
    I: IntoIterator<Item = &'a Commit>,
{
    let mut highest = BumpKind::None;
    for commit in commits {
        let kind = classify(commit);
        if kind == BumpKind::Major {
            return BumpKind::Major;
        }
        highest = highest.max(kind);
    }
    highest
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn commit(commit_type: Option<CommitType>, breaking: bool) -> Commit {
        Commit {
            hash: "deadbeef".to_string(),
            short_hash: "deadbee".to_string(),
            message: "test".to_string(),
            commit_type: commit_type.clone(),
            scope: None,
            description: "test".to_string(),
            is_conventional: commit_type.is_some(),
            is_breaking: breaking,
            references: Vec::new(),
            authors: Vec::new(),
            date: Utc::now(),
        }
    }

    #[test]
    fn non_conventional_is_none() {
        assert_eq!(classify(&commit(None, false)), BumpKind::None);
    }

    #[test]
    fn breaking_wins_regardless_of_type() {
        assert_eq!(
            classify(&commit(Some(CommitType::Docs), true)),
            BumpKind::Major
        );
        assert_eq!(
            classify(&commit(Some(CommitType::Fix), true)),
            BumpKind::Major
        );
    }

    #[test]
    fn feat_is_minor_fix_and_perf_are_patch() {
        assert_eq!(classify(&commit(Some(CommitType::Feat), false)), BumpKind::Minor);
        assert_eq!(classify(&commit(Some(CommitType::Fix), false)), BumpKind::Patch);
        assert_eq!(classify(&commit(Some(CommitType::Perf), false)), BumpKind::Patch);
    }

    #[test]
    fn other_conventional_types_are_none() {
        for t in [
            CommitType::Chore,
            CommitType::Docs,
            CommitType::Style,
            CommitType::Refactor,
            CommitType::Test,
            CommitType::Build,
            CommitType::Ci,
            CommitType::Other("wip".to_string()),
        ] {
            assert_eq!(classify(&commit(Some(t), false)), BumpKind::None);
        }
    }

    #[test]
    fn aggregate_of_empty_is_none() {
        assert_eq!(aggregate([]), BumpKind::None);
    }

    #[test]
    fn aggregate_takes_the_maximum() {
        let commits = [
            commit(Some(CommitType::Fix), false),
            commit(Some(CommitType::Feat), false),
            commit(Some(CommitType::Chore), false),
        ];
        assert_eq!(aggregate(&commits), BumpKind::Minor);
    }

    #[test]
    fn single_breaking_commit_forces_major() {
        let commits = [
            commit(Some(CommitType::Chore), false),
            commit(Some(CommitType::Docs), true),
            commit(Some(CommitType::Fix), false),
        ];
        assert_eq!(aggregate(&commits), BumpKind::Major);
    }

    #[test]
    fn adding_a_commit_never_decreases_severity() {
        let base = [commit(Some(CommitType::Feat), false)];
        let before = aggregate(&base);

        for extra in [
            commit(None, false),
            commit(Some(CommitType::Chore), false),
            commit(Some(CommitType::Fix), false),
            commit(Some(CommitType::Feat), true),
        ] {
            let mut extended = base.to_vec();
            extended.push(extra);
            assert!(aggregate(&extended) >= before);
        }
    }
}
