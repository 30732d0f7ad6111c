//! Output formatting for reports and author listings.

pub mod json;
pub mod markdown;

pub use json::{author_detail_json, compact_author, counts_json, report_json};
pub use markdown::{
    format_author_detail_markdown, format_counts_markdown, format_report_markdown,
    format_skipped_markdown,
};
