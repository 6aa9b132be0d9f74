#![no_main]

use libfuzzer_sys::fuzz_target;
use piserve_core::YcdFile;

fuzz_target!(|data: &[u8]| {
    // Header parsing runs on bytes fetched from the bucket; it must
    // reject anything malformed without panicking.
    // Tests handling of:
    // - Missing or misplaced EndHeader terminators
    // - Non-UTF-8 header text
    // - Truncated headers with no NUL separator
    // - Garbage numeric fields and out-of-range radices
    let _ = YcdFile::parse("fuzz.ycd", data);
});
