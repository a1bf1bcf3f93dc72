// Fault taxonomy. Every variant is fatal to the run; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Malformed or missing setting, detected at startup.
    #[error("config error: {0}")]
    Config(String),
    /// Cluster unreachable, or the baseline inventory could not be read.
    #[error("connection error: {0}")]
    Connection(String),
    /// The per-tick metrics query failed. A partial tick is never recorded.
    #[error("sampling error: {0}")]
    Sampling(String),
    /// Internal invariant violated (e.g. append of an empty aggregate).
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("cannot summarize an empty history")]
    EmptyHistory,
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Snapshot file could not be encoded or does not describe a valid series set.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl ChartError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short stable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Connection(_) => "CONNECTION",
            Self::Sampling(_) => "SAMPLING",
            Self::Precondition(_) => "PRECONDITION",
            Self::EmptyHistory => "EMPTY_HISTORY",
            Self::Io { .. } => "IO",
            Self::Snapshot(_) => "SNAPSHOT",
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
