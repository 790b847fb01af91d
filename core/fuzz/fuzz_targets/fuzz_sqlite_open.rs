#![no_main]

use libfuzzer_sys::fuzz_target;
use pbix_extract::SqliteDb;

fuzz_target!(|data: &[u8]| {
    if let Ok(db) = SqliteDb::open(data.to_vec()) {
        let names: Vec<String> = db.table_names().map(str::to_string).collect();
        for name in names {
            let _ = db.get_table_rows(&name);
        }
    }
});
