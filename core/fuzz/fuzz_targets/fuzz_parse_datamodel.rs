#![no_main]

use libfuzzer_sys::fuzz_target;
use pbix_extract::{parse_pbix_data_model, StoredCodec};

fuzz_target!(|data: &[u8]| {
    let mut codec = StoredCodec;
    let _ = parse_pbix_data_model(data, &mut codec);
});
