#![no_main]

use libfuzzer_sys::fuzz_target;
use pbix_extract::AbfIndex;

fuzz_target!(|data: &[u8]| {
    if let Ok(index) = AbfIndex::parse(data.to_vec()) {
        let names: Vec<String> = index.file_names().map(str::to_string).collect();
        for name in names {
            let _ = index.get_data_slice(&name);
        }
    }
});
