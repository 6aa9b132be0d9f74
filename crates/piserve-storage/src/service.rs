//! Digit Service
//!
//! [`Service`] is the top-level entry point: given a result set and a
//! logical digit range, it assembles the per-request read pipeline and
//! returns the ASCII digits.
//!
//! Logical position 0 is the single digit before the decimal point ('3'),
//! which the shard files do not store; positions 1 and up are the
//! fractional digits the shards encode from offset 0. This is the only
//! place that translates between the two conventions.

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;

use piserve_core::ResultSet;

use crate::bucket::{Bucket, ObjectBucket};
use crate::cache::CachedReader;
use crate::error::Result;
use crate::reader::SetReader;
use crate::unpack::UnpackReader;

/// Serves digit ranges of π out of an object-store bucket.
pub struct Service {
    bucket: Arc<dyn Bucket>,
}

impl Service {
    /// Service over an existing bucket handle.
    pub fn new(bucket: Arc<dyn Bucket>) -> Self {
        Self { bucket }
    }

    /// Connects to the S3 bucket named `bucket_name`, taking credentials,
    /// region, and endpoint from the environment.
    pub fn connect(bucket_name: &str) -> Result<Self> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket_name)
            .build()?;
        Ok(Self::new(Arc::new(ObjectBucket::new(Arc::new(store)))))
    }

    /// Returns `n` digits of π from `set`, starting at logical position
    /// `start` where position 0 is the digit before the decimal point.
    ///
    /// A range reaching past the end of the set is truncated, not an
    /// error; callers that want a hard boundary validate against
    /// `set.total_digits()` first.
    pub async fn get(&self, set: &ResultSet, start: u64, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        tracing::debug!(radix = set.radix(), start, n, "get digits");

        let mut out = vec![0u8; n];
        // The shards count from the first fractional digit; the public
        // offset counts from the integer digit in front of it.
        let (mut filled, inner_start) = if start == 0 {
            out[0] = set.first_digit();
            (1, 0)
        } else {
            (0, start - 1)
        };

        let reader = UnpackReader::new(
            CachedReader::new(SetReader::new(set, Arc::clone(&self.bucket))),
            set,
        );
        let read = reader.read_at(&mut out[filled..], inner_start).await?;
        filled += read;
        out.truncate(filled);
        Ok(out)
    }
}
