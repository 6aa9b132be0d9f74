//! Compiled-In Shard Manifest
//!
//! The production shard index is generated offline by scanning the bucket
//! once and recording every shard's header geometry. The shards within one
//! radix differ only in block id and object name, so the table compresses
//! to a handful of constants and a builder per radix.
//!
//! The manifest is authoritative: its `total_digits()` defines the range
//! the service will serve, regardless of what else sits in the bucket.

use crate::resultset::ResultSet;
use crate::ycd::{Header, YcdFile};

/// Default bucket holding the production shard files.
pub const BUCKET_NAME: &str = "pi-digits";

const FILE_VERSION: &str = "1.1.0";
const HEADER_LENGTH: u64 = 198;
const FIRST_DIGIT_OFFSET: u64 = 201;

/// Digits per shard, identical for both radices.
const SHARD_BLOCK_SIZE: u64 = 250_000_000_000;

const DEC_FIRST_DIGITS: &str = "3.14159265358979323846264338327950288419716939937510";
const DEC_SHARDS: u64 = 400;

const HEX_FIRST_DIGITS: &str = "3.243f6a8885a308d313198a2e03707344a4093822299f31d008";
const HEX_SHARDS: u64 = 333;
/// The hex computation stops mid-shard; the final shard carries the cap.
const HEX_TOTAL_DIGITS: u64 = 83_048_202_372_184;

/// The decimal result set: 100 trillion digits.
pub fn decimal() -> ResultSet {
    build(10, "Pi - Dec - Chudnovsky", DEC_FIRST_DIGITS, DEC_SHARDS, 0)
}

/// The hexadecimal result set: 83,048,202,372,184 digits.
pub fn hexadecimal() -> ResultSet {
    build(16, "Pi - Hex - Chudnovsky", HEX_FIRST_DIGITS, HEX_SHARDS, HEX_TOTAL_DIGITS)
}

fn build(radix: u32, prefix: &str, first_digits: &str, shards: u64, cap: u64) -> ResultSet {
    let files = (0..shards)
        .map(|id| YcdFile {
            header: Header {
                file_version: FILE_VERSION.to_string(),
                radix,
                first_digits: first_digits.to_string(),
                total_digits: if cap != 0 && id == shards - 1 { cap } else { 0 },
                block_size: SHARD_BLOCK_SIZE,
                block_id: id,
                length: HEADER_LENGTH,
            },
            name: format!("{prefix}/{prefix} - {id}.ycd"),
            first_digit_offset: FIRST_DIGIT_OFFSET,
        })
        .collect();
    ResultSet::new(files).expect("static manifest is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_totals() {
        let set = decimal();
        assert_eq!(set.radix(), 10);
        assert_eq!(set.len(), 400);
        assert_eq!(set.total_digits(), 100_000_000_000_000);
        assert_eq!(set.first_digit(), b'3');
    }

    #[test]
    fn hexadecimal_totals() {
        let set = hexadecimal();
        assert_eq!(set.radix(), 16);
        assert_eq!(set.len(), 333);
        assert_eq!(set.total_digits(), HEX_TOTAL_DIGITS);
        // The cap lands inside the last shard.
        let full = (set.len() as u64 - 1) * set.block_size();
        assert!(HEX_TOTAL_DIGITS > full);
        assert!(HEX_TOTAL_DIGITS < full + set.block_size());
    }

    #[test]
    fn shard_names() {
        let set = decimal();
        assert_eq!(
            set.files()[7].name,
            "Pi - Dec - Chudnovsky/Pi - Dec - Chudnovsky - 7.ycd"
        );
    }
}
