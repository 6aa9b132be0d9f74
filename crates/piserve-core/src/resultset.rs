//! Result Sets
//!
//! A result set is the totally-ordered list of shards holding one radix's
//! digit stream. It owns the offset arithmetic that the read pipeline
//! relies on: mapping a byte offset within the concatenated digit regions
//! to a concrete `(shard, local offset)` pair, and deriving set-wide
//! totals from the shard headers.
//!
//! All byte figures here are geometric: they assume every shard is full.
//! The last shard of a digit-capped set may be shorter on disk; readers
//! discover that through end-of-stream, not through this module.

use crate::error::{Error, Result};
use crate::ycd::YcdFile;

/// The ordered shards of one radix's digit stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    files: Vec<YcdFile>,
}

impl ResultSet {
    /// Builds a result set from shard descriptors, sorting them by block
    /// id and validating the set invariants: ids contiguous from zero,
    /// uniform radix and block size, and a digit cap only on the final
    /// shard.
    pub fn new(mut files: Vec<YcdFile>) -> Result<ResultSet> {
        if files.is_empty() {
            return Err(Error::InvalidResultSet("no shards"));
        }
        files.sort_by_key(|f| f.header.block_id);

        let first = files[0].header.clone();
        if first.radix != 10 && first.radix != 16 {
            return Err(Error::UnsupportedRadix(first.radix));
        }
        if first.block_size == 0 {
            return Err(Error::InvalidResultSet("zero block size"));
        }
        let last = files.len() - 1;
        for (i, file) in files.iter().enumerate() {
            let h = &file.header;
            if h.block_id != i as u64 {
                return Err(Error::InvalidResultSet("block ids not contiguous from zero"));
            }
            if h.radix != first.radix {
                return Err(Error::InvalidResultSet("mixed radix"));
            }
            if h.block_size != first.block_size {
                return Err(Error::InvalidResultSet("mixed block size"));
            }
            if h.total_digits != 0 && i != last {
                return Err(Error::InvalidResultSet("digit cap on a non-final shard"));
            }
        }
        Ok(ResultSet { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[YcdFile] {
        &self.files
    }

    pub fn radix(&self) -> u32 {
        self.files[0].header.radix
    }

    pub fn block_size(&self) -> u64 {
        self.files[0].header.block_size
    }

    pub fn digits_per_word(&self) -> u64 {
        self.files[0].header.digits_per_word()
    }

    /// Byte length of a full shard's digit region.
    pub fn block_byte_length(&self) -> u64 {
        self.files[0].header.block_byte_length()
    }

    /// The digit before the decimal point, as ASCII.
    pub fn first_digit(&self) -> u8 {
        self.files[0].header.first_digit()
    }

    /// Total fractional digits served by this set: the final shard's digit
    /// cap when present, otherwise every shard is full.
    pub fn total_digits(&self) -> u64 {
        let last = &self.files[self.files.len() - 1].header;
        if last.total_digits != 0 {
            last.total_digits
        } else {
            self.files.len() as u64 * last.block_size
        }
    }

    /// Byte length of the concatenated digit regions, as if every shard
    /// were full. A digit-capped final shard is shorter on disk; readers
    /// tolerate that via end-of-stream.
    pub fn total_byte_length(&self) -> u64 {
        self.files.len() as u64 * self.block_byte_length()
    }

    /// Maps a byte offset within the concatenated digit regions to
    /// `(shard index, offset within that shard's digit region)`. Offsets
    /// at or past the end map to `(len(), 0)`.
    pub fn offset_to_block_pos(&self, offset: u64) -> (usize, u64) {
        let block_bytes = self.block_byte_length();
        let idx = (offset / block_bytes) as usize;
        if idx >= self.files.len() {
            (self.files.len(), 0)
        } else {
            (idx, offset % block_bytes)
        }
    }
}
