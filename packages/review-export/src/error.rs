//! Typed errors for the export pipeline.

use beds24_client::Beds24Error;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating, opening, reading or writing one of the pipeline files failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Upstream request failed; never retried
    #[error("Beds24 API error: {0}")]
    Api(#[from] Beds24Error),

    /// A review could not be re-encoded as JSON
    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ExportError {
    /// Adapter for `map_err` that tags an I/O error with the file it hit.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
