#![no_main]

use coauthor_graph::parser::parse_pubmed_record;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary documents must yield Ok or Err, never a panic
    if let Ok(xml) = std::str::from_utf8(data) {
        let _ = parse_pubmed_record("0", xml);
    }
});
