//! Piserve Storage Layer
//!
//! This crate implements the read pipeline that turns a logical digit
//! range into ASCII digits fetched out of the object store:
//!
//! ```text
//! Service::get(set, start, n)
//!         ↓ fractional digit offsets
//! UnpackReader      - packed 64-bit words → ASCII digits
//!         ↓ byte offsets
//! CachedReader      - read-through, 64 KiB-aligned, single-flight
//!         ↓ block-sized reads
//! SetReader         - one virtual stream over every shard's digit region
//!         ↓ per-shard ranges
//! Bucket            - minimal ranged-read capability over the store
//! ```
//!
//! Shards live in a high-latency object store, so the cache is the load-
//! bearing piece: the unpack layer reads eight bytes per packed word, and
//! without block alignment every word would cost a ranged GET.
//!
//! Readers are per-request and single-use; the bucket handle is the only
//! long-lived piece. End of stream is always expressed as a short read,
//! never as an error.

pub mod bucket;
pub mod cache;
pub mod error;
pub mod reader;
pub mod service;
pub mod unpack;

pub use bucket::{Bucket, ObjectBucket};
pub use cache::CachedReader;
pub use error::{Error, Result};
pub use reader::{ReadAt, SetReader};
pub use service::Service;
pub use unpack::UnpackReader;
