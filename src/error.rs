//! Error types for the instrumentation facilities.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading one of the external instrumentation sources.
#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("process {0} is not visible to the system sampler")]
    ProcessNotFound(u32),

    #[error("memory sampling unavailable: {0}")]
    Unavailable(String),
}
