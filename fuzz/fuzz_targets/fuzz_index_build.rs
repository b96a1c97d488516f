#![no_main]
use libfuzzer_sys::fuzz_target;
use tarfs_rs::EntryTable;

// Malformed archives must surface as errors, never panics.
fuzz_target!(|data: &[u8]| {
    if let Ok(table) = EntryTable::build(data.to_vec()) {
        for (_, view) in table.iter() {
            assert!(view.len() <= data.len());
        }
    }
});
