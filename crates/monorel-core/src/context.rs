use std::path::PathBuf;

/// Explicit run-wide context threaded through the pipeline.
///
/// There is intentionally no module-level "is this CI" flag; callers
/// construct one of these at startup and pass it down.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub cwd: PathBuf,
    /// Whether interactive prompts may be shown.
    pub interactive: bool,
    /// Whether the process appears to run unattended.
    pub ci: bool,
}

impl RunContext {
    /// Probes the environment once; `interactive` is forced off when a
    /// CI environment is detected.
    #[must_use]
    pub fn detect(cwd: PathBuf, interactive: bool) -> Self {
        let ci = is_ci_environment();
        Self {
            cwd,
            interactive: interactive && !ci,
            ci,
        }
    }

    #[must_use]
    pub fn non_interactive(cwd: PathBuf) -> Self {
        Self {
            cwd,
            interactive: false,
            ci: is_ci_environment(),
        }
    }
}

fn is_ci_environment() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE"]
        .iter()
        .any(|var| matches!(std::env::var(var), Ok(v) if !v.is_empty() && v != "false"))
}
