//! Fuzzing library for coauthor-graph.
//!
//! This crate provides fuzzing targets for the efetch record parser and the
//! name normalizer, the two places untrusted text enters the graph.
//!
//! # Usage
//!
//! ```bash
//! cd crates/graph-fuzz
//! cargo +nightly fuzz run fuzz_record_parse -- -max_total_time=60
//! ```

pub use coauthor_graph::{models, parser};
