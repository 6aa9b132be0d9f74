//! Bucket Abstraction
//!
//! The read pipeline needs exactly one capability from the object store:
//! "give me up to `len` bytes of this object starting at `offset`". The
//! [`Bucket`] trait captures that, so production runs against S3 (or a
//! local directory in development) while tests run against
//! `object_store::memory::InMemory`.
//!
//! `object_store::get_range` rejects ranges that extend past the end of an
//! object, but the pipeline deliberately reads with full-shard geometry
//! even though a digit-capped final shard is shorter on disk. The
//! [`ObjectBucket`] implementation absorbs that mismatch: it learns each
//! object's size once via `head` and clamps every range, so upper layers
//! see short reads at end of stream and never a range error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path;
use object_store::ObjectStore;
use tokio::sync::Mutex;

use crate::error::Result;

/// Minimal ranged-read capability the read pipeline consumes.
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Reads up to `len` bytes of object `name` starting at `offset`.
    ///
    /// Returns fewer bytes when the range extends past the end of the
    /// object; a range entirely past the end yields an empty buffer.
    /// Errors are reserved for store failures.
    async fn read_range(&self, name: &str, offset: u64, len: usize) -> Result<Bytes>;
}

/// [`Bucket`] implementation over any [`ObjectStore`] backend.
pub struct ObjectBucket {
    store: Arc<dyn ObjectStore>,
    // Object sizes learned via head, one per object per process. Shards
    // are immutable, so a memoised size never goes stale.
    sizes: Mutex<HashMap<String, u64>>,
}

impl ObjectBucket {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            sizes: Mutex::new(HashMap::new()),
        }
    }

    async fn object_size(&self, name: &str) -> Result<u64> {
        if let Some(&size) = self.sizes.lock().await.get(name) {
            return Ok(size);
        }
        let meta = self.store.head(&Path::from(name)).await?;
        tracing::debug!(object = name, size = meta.size, "learned object size");
        self.sizes.lock().await.insert(name.to_string(), meta.size);
        Ok(meta.size)
    }
}

#[async_trait]
impl Bucket for ObjectBucket {
    async fn read_range(&self, name: &str, offset: u64, len: usize) -> Result<Bytes> {
        let size = self.object_size(name).await?;
        let end = size.min(offset.saturating_add(len as u64));
        if offset >= end {
            return Ok(Bytes::new());
        }
        Ok(self.store.get_range(&Path::from(name), offset..end).await?)
    }
}
