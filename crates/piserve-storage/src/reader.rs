//! Multi-Shard Range Reader
//!
//! [`SetReader`] presents the packed digit regions of every shard in a
//! result set as one contiguous, positionally-addressed byte stream. A
//! read that spans a shard boundary is split into per-shard ranged
//! fetches; the caller only ever sees one flat offset space.
//!
//! The reader trusts the set's full-shard geometry. When the final shard
//! of a digit-capped set ends early on disk, the bucket returns a short
//! range and the reader stops there: end of stream is a short read, never
//! an error.

use std::sync::Arc;

use async_trait::async_trait;
use piserve_core::ResultSet;

use crate::bucket::Bucket;
use crate::error::Result;

/// Positional byte reader. The storage pipeline is built out of layers of
/// this trait.
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Reads into `buf` starting at `offset`, returning the number of
    /// bytes read. A short (possibly zero) count means end of stream;
    /// errors are reserved for underlying failures.
    async fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize>;
}

/// One virtual byte stream over the concatenated digit regions of a
/// result set's shards.
pub struct SetReader<'a> {
    set: &'a ResultSet,
    bucket: Arc<dyn Bucket>,
}

impl<'a> SetReader<'a> {
    pub fn new(set: &'a ResultSet, bucket: Arc<dyn Bucket>) -> Self {
        Self { set, bucket }
    }
}

#[async_trait]
impl ReadAt for SetReader<'_> {
    async fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let block_bytes = self.set.block_byte_length();
        let mut filled = 0;
        let mut pos = offset;

        while filled < buf.len() {
            let (idx, local) = self.set.offset_to_block_pos(pos);
            if idx >= self.set.len() {
                break;
            }
            let file = &self.set.files()[idx];
            let span = ((buf.len() - filled) as u64).min(block_bytes - local) as usize;
            tracing::debug!(shard = %file.name, offset = local, len = span, "shard range read");
            let bytes = self
                .bucket
                .read_range(&file.name, file.first_digit_offset + local, span)
                .await?;
            buf[filled..filled + bytes.len()].copy_from_slice(&bytes);
            filled += bytes.len();
            pos += bytes.len() as u64;
            if bytes.len() < span {
                // Physical end of a digit-capped final shard.
                break;
            }
        }
        Ok(filled)
    }
}
