//! Storage Error Types
//!
//! All read-pipeline operations return `Result<T>` aliased to
//! `Result<T, Error>`, so `?` propagates cleanly across the layers. End of
//! stream is not an error anywhere in this crate; it is a short read.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("shard format error: {0}")]
    Format(#[from] piserve_core::Error),

    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
