//! Inverse dependency graph over workspace members.
//!
//! The graph only knows edges between members; dependencies pointing
//! outside the workspace cannot be cascaded and are ignored at build
//! time.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use monorel_workspace::Package;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Dependency name to the set of members depending on it.
    dependents: IndexMap<String, BTreeSet<String>>,
    members: BTreeSet<String>,
}

impl DependencyGraph {
    /// Builds the inverse edge map from each member's workspace
    /// dependency lists. Deterministic for a given package slice.
    #[must_use]
    pub fn build(packages: &[Package]) -> Self {
        let members: BTreeSet<String> = packages.iter().map(|pkg| pkg.name.clone()).collect();

        let mut dependents: IndexMap<String, BTreeSet<String>> = IndexMap::new();
        for package in packages {
            let deps = package
                .workspace_dependencies
                .iter()
                .chain(&package.workspace_dev_dependencies);
            for dependency in deps {
                if members.contains(dependency) {
                    dependents
                        .entry(dependency.clone())
                        .or_default()
                        .insert(package.name.clone());
                }
            }
        }

        Self {
            dependents,
            members,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    /// Direct dependents of `name`, empty when it has none.
    #[must_use]
    pub fn dependents(&self, name: &str) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.dependents.get(name).unwrap_or(&EMPTY)
    }

    /// Every member reachable over inverse edges from `roots`, with the
    /// longest distance from a root as its level. The roots themselves
    /// are not part of the closure. Sorted by `(level, name)` so the
    /// result doubles as a dependency-consistent write order.
    ///
    /// Cycles between members are tolerated: the walk marks in-progress
    /// nodes and a member on a cycle keeps the level of its first
    /// discovery.
    #[must_use]
    pub fn dependent_closure(&self, roots: &[String]) -> Vec<(String, usize)> {
        let mut levels: IndexMap<String, usize> = IndexMap::new();
        let mut in_progress: HashSet<String> = HashSet::new();

        for root in roots {
            self.walk(root, 0, &mut levels, &mut in_progress);
        }

        let root_set: HashSet<&String> = roots.iter().collect();
        let mut closure: Vec<(String, usize)> = levels
            .into_iter()
            .filter(|(name, _)| !root_set.contains(name))
            .collect();
        closure.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        closure
    }

    fn walk(
        &self,
        name: &str,
        level: usize,
        levels: &mut IndexMap<String, usize>,
        in_progress: &mut HashSet<String>,
    ) {
        if in_progress.contains(name) {
            return;
        }
        match levels.get_mut(name) {
            Some(existing) if *existing >= level => return,
            Some(existing) => *existing = level,
            None => {
                levels.insert(name.to_string(), level);
            }
        }

        in_progress.insert(name.to_string());
        if let Some(dependents) = self.dependents.get(name) {
            for dependent in dependents {
                self.walk(dependent, level + 1, levels, in_progress);
            }
        }
        in_progress.remove(name);
    }
}
