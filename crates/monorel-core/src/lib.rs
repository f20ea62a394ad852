mod context;
mod types;

pub use context::RunContext;
pub use types::{
    BumpKind, ChangeKind, OverrideMap, PackageRelease, ParseBumpKindError, VersionOverride,
};
