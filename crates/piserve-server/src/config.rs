//! Environment configuration.
//!
//! All settings come from the environment. An unparseable value is logged
//! and replaced by its default rather than failing startup.
//!
//! - `PI_HTTP_ADDR`: bind address (default `0.0.0.0:8080`)
//! - `PI_BUCKET`: shard bucket name (default: the manifest bucket)
//! - `PI_MAX_DIGITS`: per-request digit cap (default 1000)
//! - `PI_LOCAL_STORAGE`: serve shards from this local directory instead
//!   of S3; development only
//! - `LOG_FORMAT`: `text` (default) or `json`

use std::path::PathBuf;

use piserve_core::index;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: String,
    pub bucket: String,
    pub max_digits: u64,
    pub local_storage: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            http_addr: std::env::var("PI_HTTP_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            bucket: std::env::var("PI_BUCKET")
                .unwrap_or_else(|_| index::BUCKET_NAME.to_string()),
            max_digits: env_u64("PI_MAX_DIGITS", 1000),
            local_storage: std::env::var("PI_LOCAL_STORAGE").ok().map(PathBuf::from),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::error!(name, value = %value, "invalid env value, using default");
                default
            }
        },
        Err(_) => default,
    }
}
