use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during ZFS kstat collection and parsing
#[derive(Debug, Error)]
pub enum ZfsError {
    /// A kstat pseudo-file could not be opened or read
    #[error("could not open {}: {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The table header line never appeared in the file
    #[error("no statistics parsed from {}: header '{expected}' not found", path.display())]
    MissingHeader { path: PathBuf, expected: String },

    /// A counter value was not a base-10 unsigned integer
    #[error("could not parse {data_source} value for [{key}] as uint64: '{value}'")]
    ValueParseFailed {
        data_source: String,
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// An I/O data row ended before the header's columns did
    #[error("row in {} has no value for column {column} at position {position}", path.display())]
    ShortRow {
        path: PathBuf,
        column: String,
        position: usize,
    },

    /// The pool state file had no first line
    #[error("could not read state from {}: EOF", path.display())]
    EmptyState { path: PathBuf },

    /// Any failure while reading a single pool
    #[error("could not gather statistics for pool {pool}: {source}")]
    PoolFailed {
        pool: String,
        #[source]
        source: Box<ZfsError>,
    },
}

impl ZfsError {
    /// Create an open error
    pub fn open_failed(path: &Path, source: io::Error) -> Self {
        ZfsError::OpenFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a missing header error
    pub fn missing_header(path: &Path, expected: &str) -> Self {
        ZfsError::MissingHeader {
            path: path.to_path_buf(),
            expected: expected.to_string(),
        }
    }

    /// Create a value parse error
    pub fn value_parse_failed(
        data_source: &str,
        key: &str,
        value: &str,
        source: ParseIntError,
    ) -> Self {
        ZfsError::ValueParseFailed {
            data_source: data_source.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            source,
        }
    }

    /// Wrap a per-pool failure with the pool name
    pub fn pool_failed(pool: &str, source: ZfsError) -> Self {
        ZfsError::PoolFailed {
            pool: pool.to_string(),
            source: Box::new(source),
        }
    }

    /// Whether the driver may record this as a warning instead of aborting.
    ///
    /// Only failures that can come out of the ARC statistics reader are soft.
    /// Everything pool related voids the whole pass.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            ZfsError::OpenFailed { .. }
                | ZfsError::MissingHeader { .. }
                | ZfsError::ValueParseFailed { .. }
        )
    }
}

/// Result type alias for ZFS operations
pub type ZfsResult<T> = Result<T, ZfsError>;
