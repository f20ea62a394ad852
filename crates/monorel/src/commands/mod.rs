mod apply;
mod plan;

use std::io::IsTerminal;
use std::path::Path;

use clap::{Args, Subcommand};
use indexmap::IndexMap;
use monorel_commit::Commit;
use monorel_core::RunContext;
use monorel_git::Repository;
use monorel_graph::DependencyGraph;
use monorel_plan::{PlanInput, PlanOutcome};
use monorel_workspace::{Config, Workspace, discover_workspace};

use crate::collect::collect_commits;
use crate::error::{CliError, Result};
use crate::interaction::{NonInteractiveProvider, TerminalInteractionProvider};
use crate::overrides;

#[derive(Args)]
pub(crate) struct PlanArgs {
    /// Base ref for commit collection (default: merge-base of the
    /// default branch and HEAD)
    #[arg(long)]
    from: Option<String>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    /// Never prompt; replay stored decisions and accept every inferred
    /// version
    #[arg(long, short = 'y')]
    yes: bool,
}

#[derive(Args)]
pub(crate) struct ApplyArgs {
    /// Base ref for commit collection (default: merge-base of the
    /// default branch and HEAD)
    #[arg(long)]
    from: Option<String>,

    /// Never prompt; replay stored decisions and accept every inferred
    /// version
    #[arg(long, short = 'y')]
    yes: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compute and print the release plan without writing anything
    Plan(PlanArgs),
    /// Compute the plan, then write manifests, changelogs and the
    /// stored decisions
    Apply(ApplyArgs),
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Plan(args) => plan::run(start_path, &args),
            Self::Apply(args) => apply::run(start_path, &args),
        }
    }
}

/// Everything both subcommands share: workspace, config, repository,
/// grouped commits and the finished plan.
pub(crate) struct Pipeline {
    pub workspace: Workspace,
    pub config: Config,
    pub repository: Repository,
    pub commits: IndexMap<String, Vec<Commit>>,
    pub outcome: PlanOutcome,
}

pub(crate) fn compute(start_path: &Path, from: Option<&str>, yes: bool) -> Result<Pipeline> {
    let workspace = discover_workspace(start_path)?;
    if workspace.packages.is_empty() {
        return Err(CliError::EmptyWorkspace(workspace.root.clone()));
    }

    let config = Config::load(&workspace.root)?;
    let repository = Repository::open(&workspace.root)?;
    let context = RunContext::detect(
        workspace.root.clone(),
        !yes && std::io::stdin().is_terminal(),
    );

    let commits = collect_commits(&repository, &workspace, from, config.global_attribution())?;
    let stored = overrides::load(&config.overrides_file(&workspace.root))?;
    let graph = DependencyGraph::build(&workspace.packages);

    let input = PlanInput {
        packages: &workspace.packages,
        graph: &graph,
        commits: &commits,
        overrides: &stored,
        interactive: context.interactive,
    };
    let outcome = if context.interactive {
        monorel_plan::plan(&input, &TerminalInteractionProvider)?
    } else {
        monorel_plan::plan(&input, &NonInteractiveProvider)?
    };

    Ok(Pipeline {
        workspace,
        config,
        repository,
        commits,
        outcome,
    })
}
