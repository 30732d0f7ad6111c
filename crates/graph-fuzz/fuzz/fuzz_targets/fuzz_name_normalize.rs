#![no_main]

use coauthor_graph::models::normalize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // A name that normalizes once must normalize to itself
    if let Ok(once) = normalize(data) {
        assert_eq!(normalize(&once).ok().as_deref(), Some(once.as_str()));
    }
});
