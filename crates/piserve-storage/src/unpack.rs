//! Packed-Word Unpacking
//!
//! Shards store digits as little-endian 64-bit words, each packing up to
//! `W` digits (19 for radix 10, 16 for radix 16) as the word's radix
//! expansion: within a shard, the digit at offset `w * W + k` is
//! `(word_w / radix^k) % radix`. [`UnpackReader`] converts that encoding
//! back into ASCII and exposes a positional interface addressed in
//! *digits* rather than bytes.
//!
//! Shards pack independently. When `block_size` is not a multiple of `W`
//! (it rarely is), every shard ends in a partially-filled word, so a
//! digit offset cannot simply be divided by `W`: it is first decomposed
//! into `(shard, offset within shard)` and only then into
//! `(word, digit within word)`. The matching byte position in the
//! concatenated stream is `shard * block_byte_length + word * 8`.
//!
//! Two more boundaries need care:
//!
//! - A read can start mid-word. The low `intra` digits are skipped by one
//!   up-front division by `radix^intra`, then digits stream out of the
//!   word low-to-high.
//! - The final word of a digit-capped set may be truncated on disk. Short
//!   byte reads are zero-extended to a full word, but only digits the
//!   result set promises are ever emitted; past `total_digits` the reader
//!   returns a clean end of stream.

use piserve_core::ResultSet;

use crate::error::Result;
use crate::reader::ReadAt;

const DIGIT_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Converts packed digit words read from `R` into ASCII digits.
pub struct UnpackReader<R> {
    inner: R,
    radix: u64,
    digits_per_word: u64,
    block_size: u64,
    block_byte_length: u64,
    total_digits: u64,
}

impl<R: ReadAt> UnpackReader<R> {
    pub fn new(inner: R, set: &ResultSet) -> Self {
        Self {
            inner,
            radix: set.radix() as u64,
            digits_per_word: set.digits_per_word(),
            block_size: set.block_size(),
            block_byte_length: set.block_byte_length(),
            total_digits: set.total_digits(),
        }
    }

    /// Reads ASCII digits into `buf`, starting at fractional digit
    /// position `digit_off` of the set's digit stream. Returns the number
    /// of digits produced; a short count means end of stream.
    pub async fn read_at(&self, buf: &mut [u8], digit_off: u64) -> Result<usize> {
        if digit_off >= self.total_digits {
            return Ok(0);
        }
        let want = (buf.len() as u64).min(self.total_digits - digit_off) as usize;
        let w = self.digits_per_word;
        let mut written = 0;
        let mut pos = digit_off;

        while written < want {
            let shard = pos / self.block_size;
            let in_shard = pos % self.block_size;
            let word = in_shard / w;
            let intra = (in_shard % w) as u32;
            let byte_off = shard * self.block_byte_length + word * 8;

            let mut packed = [0u8; 8];
            let n = self.inner.read_at(&mut packed, byte_off).await?;
            if n == 0 {
                // The stream ended before the promised digit count.
                break;
            }
            // A short read only happens on a truncated final word; the
            // missing high bytes are zero digits.
            let mut value = u64::from_le_bytes(packed);
            value /= self.radix.pow(intra);

            // A shard's last word holds only the digits left over after
            // the full words, not a full W.
            let word_digits = w.min(self.block_size - word * w);
            let take = ((word_digits - intra as u64) as usize).min(want - written);
            for _ in 0..take {
                buf[written] = DIGIT_CHARS[(value % self.radix) as usize];
                value /= self.radix;
                written += 1;
            }
            pos += take as u64;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use piserve_core::{Header, YcdFile};

    const DEC_DIGITS: &str = "1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";
    const HEX_DIGITS: &str = "243f6a8885a308d313198a2e03707344a4093822299f31d0082efa98ec4e6c89452821e638d01377be5466cf34e90c6c";

    /// Packs a digit string the way one shard stores it: `W` digits per
    /// little-endian word, least-significant digit first in stream order.
    fn pack(digits: &str, radix: u32) -> Vec<u8> {
        let w = if radix == 16 { 16 } else { 19 };
        let mut out = Vec::new();
        for chunk in digits.as_bytes().chunks(w) {
            let mut value: u64 = 0;
            for &c in chunk.iter().rev() {
                value = value * radix as u64 + (c as char).to_digit(radix).unwrap() as u64;
            }
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// Packs a digit string shard by shard, padding every shard's region
    /// to the full-block geometry, the way the concatenated stream looks
    /// to the unpack layer.
    fn pack_sharded(digits: &str, radix: u32, block_size: usize) -> Vec<u8> {
        let w: usize = if radix == 16 { 16 } else { 19 };
        let region = block_size.div_ceil(w) * 8;
        let mut out = Vec::new();
        for shard in digits.as_bytes().chunks(block_size) {
            let mut packed = pack(std::str::from_utf8(shard).unwrap(), radix);
            packed.resize(region, 0);
            out.extend_from_slice(&packed);
        }
        out
    }

    struct MemReader(Vec<u8>);

    #[async_trait]
    impl ReadAt for MemReader {
        async fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
            let offset = offset as usize;
            if offset >= self.0.len() {
                return Ok(0);
            }
            let take = buf.len().min(self.0.len() - offset);
            buf[..take].copy_from_slice(&self.0[offset..offset + take]);
            Ok(take)
        }
    }

    fn test_set(radix: u32, block_size: u64, shards: u64, total_digits: u64) -> ResultSet {
        let first_digits = if radix == 16 { "3.243f6a88" } else { "3.14159265" };
        let files = (0..shards)
            .map(|id| YcdFile {
                header: Header {
                    file_version: "1.1.0".to_string(),
                    radix,
                    first_digits: first_digits.to_string(),
                    total_digits: if id == shards - 1 { total_digits } else { 0 },
                    block_size,
                    block_id: id,
                    length: 0,
                },
                name: format!("test-{id}.ycd"),
                first_digit_offset: 0,
            })
            .collect();
        ResultSet::new(files).unwrap()
    }

    fn unpacker(digits: &str, radix: u32) -> UnpackReader<MemReader> {
        let set = test_set(radix, digits.len() as u64, 1, 0);
        UnpackReader::new(MemReader(pack(digits, radix)), &set)
    }

    #[tokio::test]
    async fn every_window_round_trips() {
        // Windows of W + 5 starting at every offset cross both word
        // boundaries and mid-word starts.
        for radix in [10u32, 16] {
            let digits = if radix == 16 { HEX_DIGITS } else { DEC_DIGITS };
            let reader = unpacker(digits, radix);
            let window = if radix == 16 { 21 } else { 24 };
            for start in 0..digits.len() {
                let mut buf = vec![0u8; window];
                let n = reader.read_at(&mut buf, start as u64).await.unwrap();
                let expected = &digits.as_bytes()[start..(start + window).min(digits.len())];
                assert_eq!(&buf[..n], expected, "radix {radix} start {start}");
            }
        }
    }

    #[tokio::test]
    async fn shard_boundaries_with_ragged_last_words() {
        // Block size 40 is not a multiple of 19: each shard ends in a
        // word holding only 2 digits, so the digit arithmetic must reset
        // per shard.
        let set = test_set(10, 40, 3, 100);
        let reader =
            UnpackReader::new(MemReader(pack_sharded(DEC_DIGITS, 10, 40)), &set);

        for start in 0..100usize {
            let mut buf = [0u8; 25];
            let n = reader.read_at(&mut buf, start as u64).await.unwrap();
            let expected = &DEC_DIGITS.as_bytes()[start..(start + 25).min(100)];
            assert_eq!(&buf[..n], expected, "start {start}");
        }
    }

    #[tokio::test]
    async fn mid_word_start_skips_low_digits() {
        let reader = unpacker(DEC_DIGITS, 10);
        let mut buf = [0u8; 5];
        let n = reader.read_at(&mut buf, 7).await.unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, DEC_DIGITS[7..12].as_bytes());
    }

    #[tokio::test]
    async fn read_past_end_is_empty() {
        let reader = unpacker(DEC_DIGITS, 10);
        let mut buf = [0u8; 8];
        assert_eq!(reader.read_at(&mut buf, 100).await.unwrap(), 0);
        assert_eq!(reader.read_at(&mut buf, 5000).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn request_is_capped_at_total_digits() {
        let reader = unpacker(DEC_DIGITS, 10);
        let mut buf = [0u8; 64];
        let n = reader.read_at(&mut buf, 90).await.unwrap();
        assert_eq!(n, 10);
        assert_eq!(&buf[..n], DEC_DIGITS[90..].as_bytes());
    }

    #[tokio::test]
    async fn truncated_final_word_is_zero_extended() {
        // 25 digits: one full word plus 6 digits in the second word. Store
        // the second word truncated to 4 bytes; its high bytes are zero,
        // so the promised digits still decode.
        let digits = &DEC_DIGITS[..25];
        let mut packed = pack(digits, 10);
        packed.truncate(12);
        let set = test_set(10, 100, 1, 25);
        let reader = UnpackReader::new(MemReader(packed), &set);

        let mut buf = [0u8; 32];
        let n = reader.read_at(&mut buf, 19).await.unwrap();
        assert_eq!(n, 6);
        assert_eq!(&buf[..n], digits[19..].as_bytes());
    }

    #[tokio::test]
    async fn stream_ending_before_promise_is_clean_eof() {
        // The set promises 40 digits but only one word is on disk.
        let packed = pack(&DEC_DIGITS[..19], 10);
        let set = test_set(10, 100, 1, 40);
        let reader = UnpackReader::new(MemReader(packed), &set);

        let mut buf = [0u8; 40];
        let n = reader.read_at(&mut buf, 0).await.unwrap();
        assert_eq!(n, 19);
        assert_eq!(&buf[..n], DEC_DIGITS[..19].as_bytes());
    }
}
