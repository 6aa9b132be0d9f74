//! Error types for shard parsing and result-set construction.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed ycd header: {0}")]
    MalformedHeader(&'static str),

    #[error("unsupported radix: {0}")]
    UnsupportedRadix(u32),

    #[error("invalid result set: {0}")]
    InvalidResultSet(&'static str),
}
