//! Shared fixtures: synthesising `.ycd` shards from known digit strings
//! and seeding them into an in-memory object store.
#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::ObjectStore;

use piserve_core::{ResultSet, YcdFile};
use piserve_storage::{Bucket, ObjectBucket};

/// First 100 fractional decimal digits of π.
pub const DEC_FRACTION: &str = "1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";

/// First 128 fractional hexadecimal digits of π.
pub const HEX_FRACTION: &str = "243f6a8885a308d313198a2e03707344a4093822299f31d0082efa98ec4e6c89452821e638d01377be5466cf34e90c6cc0ac29b7c97c50dd3f84d5b5b5470917";

/// Packs a digit string the way shard files store it: `W` digits per
/// little-endian 64-bit word, least-significant digit first in stream
/// order.
pub fn pack_digits(digits: &str, radix: u32) -> Vec<u8> {
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

/// Builds the complete bytes of one `.ycd` shard: text header, NUL
/// separator, packed digit words.
pub fn ycd_shard(
    radix: u32,
    first_digits: &str,
    digits: &str,
    block_size: u64,
    block_id: u64,
    total_digits: u64,
) -> Vec<u8> {
    let header = format!(
        "#Compressed Digit File\r\n\r\nFileVersion:\t1.1.0\r\n\r\nBase:\t{radix}\r\n\r\n\
         FirstDigits:\t{first_digits}\r\n\r\nTotalDigits:\t{total_digits}\r\n\r\n\
         Blocksize:\t{block_size}\r\nBlockID:\t{block_id}\r\n\r\nEndHeader\r\n"
    );
    let mut out = header.into_bytes();
    out.push(0);
    out.extend_from_slice(&pack_digits(digits, radix));
    out
}

/// Splits `digits` into shards of `block_size` digits, uploads them to
/// `store`, and returns the result set parsed back from the uploaded
/// bytes. A trailing partial shard carries the cumulative digit cap.
pub async fn seed_set(
    store: &InMemory,
    radix: u32,
    digits: &str,
    block_size: u64,
) -> ResultSet {
    let total = digits.len() as u64;
    let shards = total.div_ceil(block_size);
    let capped = total % block_size != 0;
    let first_digits = format!("3.{}", &digits[..digits.len().min(50)]);

    let mut files = Vec::new();
    for id in 0..shards {
        let lo = (id * block_size) as usize;
        let hi = digits.len().min(lo + block_size as usize);
        let cap = if capped && id == shards - 1 { total } else { 0 };
        let name = format!("pi-{radix}-{id}.ycd");
        let bytes = ycd_shard(radix, &first_digits, &digits[lo..hi], block_size, id, cap);
        files.push(YcdFile::parse(name.as_str(), &bytes).unwrap());
        store
            .put(&Path::from(name), Bytes::from(bytes).into())
            .await
            .unwrap();
    }
    ResultSet::new(files).unwrap()
}

pub fn object_bucket(store: Arc<InMemory>) -> Arc<dyn Bucket> {
    Arc::new(ObjectBucket::new(store))
}
