//! Data models for names, search results and fetched records.

mod name;
mod record;
mod search;

pub use name::{PersonName, collapse, normalize};
pub use record::{PubmedRecord, RecordAuthor};
pub use search::{ESearchResponse, ESearchResult, SearchSummary};
