mod classify;
mod commit;
mod parse;
mod paths;

pub use classify::{aggregate, classify};
pub use commit::{Commit, CommitAuthor, CommitReference, CommitType, ReferenceKind};
pub use parse::{RawCommit, parse_commit};
pub use paths::is_dependency_file;
