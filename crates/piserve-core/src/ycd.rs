//! `.ycd` Shard File Format
//!
//! Precomputed π digits are stored as a series of immutable `.ycd` files.
//! Every file starts with a UTF-8 text header followed by the packed digit
//! region.
//!
//! ## Header Layout
//!
//! ```text
//! #Compressed Digit File          <- comment lines start with '#'
//!
//! FileVersion:	1.1.0
//!
//! Base:	10
//!
//! FirstDigits:	3.14159265358979323846...
//!
//! TotalDigits:	0
//!
//! Blocksize:	250000000000
//! BlockID:	7
//!
//! EndHeader
//! <NUL>
//! ```
//!
//! Fields are `Label:<TAB>value` lines; unknown labels are ignored so newer
//! producers stay readable. The header ends at the `EndHeader` line; a NUL
//! byte separates it from the digit region, which starts immediately after.
//!
//! ## Digit Region
//!
//! A sequence of little-endian 64-bit words. Each word packs
//! `digits_per_word` digits (19 for radix 10, 16 for radix 16) as the
//! word's radix expansion, least-significant digit first in stream order:
//! the digit at shard offset `w * W + k` is `(word_w / radix^k) % radix`.
//!
//! `TotalDigits` carries the cumulative digit count of the whole
//! computation. It is zero in full shards and nonzero only in the final
//! shard of a digit-capped set, whose digit region may then be shorter on
//! disk than the full-block geometry suggests.

use crate::error::{Error, Result};

/// Bytes of file prefix the header parser is willing to scan.
pub const HEADER_SCAN_LIMIT: usize = 4096;

/// Bytes per packed digit word.
pub const WORD_BYTES: u64 = 8;

const HEADER_END: &[u8] = b"EndHeader";

/// Parsed `.ycd` header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Producer format version, informational only.
    pub file_version: String,
    /// Digit radix, 10 or 16.
    pub radix: u32,
    /// Human-readable digit prefix, e.g. `"3.14159..."`. Byte 0 is the
    /// digit before the decimal point.
    pub first_digits: String,
    /// Cumulative digits of the whole computation; zero in full shards,
    /// nonzero only in the last shard of a digit-capped set.
    pub total_digits: u64,
    /// Digits stored per full shard, uniform across a result set.
    pub block_size: u64,
    /// Ordinal of this shard within its result set, contiguous from 0.
    pub block_id: u64,
    /// Byte length of the header text, through the `EndHeader` line.
    pub length: u64,
}

impl Header {
    /// Parses a header from the leading bytes of a shard file.
    ///
    /// Returns the header and the absolute byte offset of the first packed
    /// digit word. At most [`HEADER_SCAN_LIMIT`] bytes of `prefix` are
    /// examined.
    pub fn parse(prefix: &[u8]) -> Result<(Header, u64)> {
        let scan = &prefix[..prefix.len().min(HEADER_SCAN_LIMIT)];

        let end = find(scan, HEADER_END)
            .ok_or(Error::MalformedHeader("missing EndHeader terminator"))?;
        let length = end + HEADER_END.len();

        // The digit region starts just past the NUL that follows the
        // terminator line.
        let nul = scan[length..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::MalformedHeader("missing NUL after EndHeader"))?;
        let first_digit_offset = (length + nul + 1) as u64;

        let text = std::str::from_utf8(&scan[..length])
            .map_err(|_| Error::MalformedHeader("header is not valid UTF-8"))?;

        let mut file_version = None;
        let mut radix = None;
        let mut first_digits = None;
        let mut total_digits = None;
        let mut block_size = None;
        let mut block_id = None;

        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') || line == "EndHeader" {
                continue;
            }
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match label {
                "FileVersion" => file_version = Some(value.to_string()),
                "Base" => radix = Some(parse_u64(value)? as u32),
                "FirstDigits" => first_digits = Some(value.to_string()),
                "TotalDigits" => total_digits = Some(parse_u64(value)?),
                "Blocksize" => block_size = Some(parse_u64(value)?),
                "BlockID" => block_id = Some(parse_u64(value)?),
                _ => {}
            }
        }

        let radix = radix.ok_or(Error::MalformedHeader("missing Base"))?;
        if radix != 10 && radix != 16 {
            return Err(Error::UnsupportedRadix(radix));
        }
        let first_digits =
            first_digits.ok_or(Error::MalformedHeader("missing FirstDigits"))?;
        if first_digits.is_empty() {
            return Err(Error::MalformedHeader("empty FirstDigits"));
        }

        let header = Header {
            file_version: file_version
                .ok_or(Error::MalformedHeader("missing FileVersion"))?,
            radix,
            first_digits,
            total_digits: total_digits
                .ok_or(Error::MalformedHeader("missing TotalDigits"))?,
            block_size: block_size.ok_or(Error::MalformedHeader("missing Blocksize"))?,
            block_id: block_id.ok_or(Error::MalformedHeader("missing BlockID"))?,
            length: length as u64,
        };
        Ok((header, first_digit_offset))
    }

    /// Digits packed into one 64-bit word: 19 for radix 10, 16 for radix
    /// 16. The radix is validated at construction.
    pub fn digits_per_word(&self) -> u64 {
        if self.radix == 16 {
            16
        } else {
            19
        }
    }

    /// Byte length of a full shard's digit region.
    pub fn block_byte_length(&self) -> u64 {
        self.block_size.div_ceil(self.digits_per_word()) * WORD_BYTES
    }

    /// The digit before the decimal point, as ASCII.
    pub fn first_digit(&self) -> u8 {
        self.first_digits.as_bytes()[0]
    }
}

/// One shard of a result set: a parsed header plus the object-store
/// location of the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YcdFile {
    pub header: Header,
    /// Object path within the bucket.
    pub name: String,
    /// Absolute byte offset of the first packed digit word.
    pub first_digit_offset: u64,
}

impl YcdFile {
    /// Builds a shard descriptor from the leading bytes of the file at
    /// `name`.
    pub fn parse(name: impl Into<String>, prefix: &[u8]) -> Result<YcdFile> {
        let (header, first_digit_offset) = Header::parse(prefix)?;
        Ok(YcdFile {
            header,
            name: name.into(),
            first_digit_offset,
        })
    }
}

fn parse_u64(value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::MalformedHeader("invalid numeric field"))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
