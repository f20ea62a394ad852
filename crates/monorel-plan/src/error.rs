use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    /// Run-level abort requested by the interaction provider
    /// (Ctrl-C). Distinct from a per-package cancel, which is a
    /// `VersionChoice::Cancelled` value rather than an error.
    #[error("planning interrupted")]
    Interrupted,

    #[error(transparent)]
    Version(#[from] monorel_version::VersionError),

    #[error("interaction failed")]
    Interaction(#[source] Box<dyn std::error::Error + Send + Sync>),
}
