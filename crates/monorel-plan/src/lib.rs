//! The version plan engine: turns grouped commits, the persisted
//! override map and the dependency graph into a deterministic list of
//! `PackageRelease` records.

mod error;
mod interaction;
mod planner;

pub use error::PlanError;
pub use interaction::{InteractionProvider, OverrideDecision, VersionChoice, VersionPrompt};
pub use planner::{plan, PlanInput, PlanOutcome};

pub type Result<T> = std::result::Result<T, PlanError>;
