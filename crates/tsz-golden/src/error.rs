use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tsz_fixture::FixtureError;

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("fixtures directory '{0}' does not exist")]
    MissingRoot(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: FixtureError,
    },

    #[error("invalid filter pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid configuration '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl HarnessError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn fixture(path: impl Into<PathBuf>, source: FixtureError) -> Self {
        HarnessError::Fixture {
            path: path.into(),
            source,
        }
    }
}
