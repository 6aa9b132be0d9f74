//! Read-Through Block Cache
//!
//! The unpack layer reads eight bytes per packed word. Issuing those as
//! individual object-store requests would put a high-latency round trip
//! on every nineteen digits, so [`CachedReader`] aligns underlying reads
//! to fixed 64 KiB blocks and serves the repeated small reads from memory.
//!
//! ## Contract
//!
//! - A resident block holds exactly the bytes the underlying reader
//!   returned for `[id * BLOCK_LEN, (id + 1) * BLOCK_LEN)`. A block
//!   shorter than `BLOCK_LEN` marks end of stream and is cached as-is.
//! - At most one underlying fetch is in flight per block id: concurrent
//!   misses on the same block share a single fetch (single-flight).
//! - A failed fetch is not cached. The error propagates to every waiter
//!   of that fetch and the next read re-attempts the block.
//! - A cancelled fetch (the reading future was dropped) leaves the block
//!   non-resident; the next read fetches it fresh.
//!
//! Both failure properties fall out of `tokio::sync::OnceCell`: an
//! initialisation that errors or is dropped leaves the cell unset.
//!
//! The cache is append-only and lives exactly as long as its reader; a
//! request touches `O(requested_bytes / BLOCK_LEN)` blocks, so per-request
//! memory stays bounded without eviction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, OnceCell};

use crate::error::Result;
use crate::reader::ReadAt;

/// Byte length of one cache block.
pub const BLOCK_LEN: usize = 64 * 1024;

/// Read-through cache over any positional reader, aligning underlying
/// reads to fixed-size blocks.
pub struct CachedReader<R> {
    inner: R,
    block_len: usize,
    blocks: Mutex<HashMap<u64, Arc<OnceCell<Bytes>>>>,
}

impl<R: ReadAt> CachedReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_block_len(inner, BLOCK_LEN)
    }

    /// Cache with a custom block length. Tests use small blocks to
    /// exercise boundary handling cheaply.
    pub fn with_block_len(inner: R, block_len: usize) -> Self {
        assert!(block_len > 0, "block length must be positive");
        Self {
            inner,
            block_len,
            blocks: Mutex::new(HashMap::new()),
        }
    }

    async fn block(&self, id: u64) -> Result<Bytes> {
        let cell = {
            let mut blocks = self.blocks.lock().await;
            Arc::clone(blocks.entry(id).or_default())
        };
        // Single-flight: one waiter runs the fetch, the rest share its
        // result. On error or cancellation the cell stays unset.
        let bytes = cell.get_or_try_init(|| self.fetch(id)).await?;
        Ok(bytes.clone())
    }

    async fn fetch(&self, id: u64) -> Result<Bytes> {
        let mut buf = vec![0u8; self.block_len];
        let n = self
            .inner
            .read_at(&mut buf, id * self.block_len as u64)
            .await?;
        buf.truncate(n);
        tracing::debug!(block = id, len = n, "cache block fill");
        Ok(Bytes::from(buf))
    }
}

#[async_trait]
impl<R: ReadAt> ReadAt for CachedReader<R> {
    async fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let mut filled = 0;
        let mut pos = offset;

        while filled < buf.len() {
            let id = pos / self.block_len as u64;
            let inner_off = (pos % self.block_len as u64) as usize;
            let block = self.block(id).await?;
            if inner_off >= block.len() {
                break;
            }
            let take = (buf.len() - filled).min(block.len() - inner_off);
            buf[filled..filled + take].copy_from_slice(&block[inner_off..inner_off + take]);
            filled += take;
            pos += take as u64;
            if block.len() < self.block_len {
                // A short block is terminal.
                break;
            }
        }
        Ok(filled)
    }
}
