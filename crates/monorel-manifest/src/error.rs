use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to write manifest '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest for '{package}'")]
    Serialize {
        package: String,
        #[source]
        source: serde_json::Error,
    },
}
