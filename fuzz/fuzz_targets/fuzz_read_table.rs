#![no_main]

use dpvcal::ingest::read_table;
use dpvcal::pipeline::{AnalysisPipeline, Batch};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Malformed exports must come back as errors or skips, never panics
    let Ok(table) = read_table(Cursor::new(data), None) else {
        return;
    };

    let mut batch = Batch::new();
    batch.push("10_mu_M", table);
    let result = AnalysisPipeline::default().run(batch);
    assert_eq!(result.rows.len() + result.skipped.len(), 1);
});
