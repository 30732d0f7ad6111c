//! Co-authorship graph builder
//!
//! Searches a bibliographic database (PubMed via NCBI E-utilities) for a list
//! of researcher names, fetches every matching record, and aggregates
//! authors, affiliations and collaboration relationships into an in-memory
//! graph.
//!
//! # Features
//!
//! - **Name normalization**: "Last, First Middle" and "First Middle Last"
//!   resolve to the same canonical key
//! - **Identity resolution**: swappable strategy, short-name fallback by default
//! - **Arena graph**: authors and articles in id-keyed stores, edges kept
//!   consistent on both sides
//! - **Rate-limited**: token-bucket pacing per request and per name
//! - **Collaboration report**: per-author article, collaborator and
//!   affiliation breakdown counts
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use coauthor_graph::{
//!     BuildOptions, CollaborationAnalyzer, Config, EntrezClient, GraphBuilder,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EntrezClient::new(Config::from_env()?)?;
//!     let builder = GraphBuilder::new(Arc::new(client), BuildOptions::default());
//!
//!     let graph = builder.build(&["Stephen Mennemeyer"], None).await?;
//!     let report = CollaborationAnalyzer::default().summarize(&graph);
//!     println!("{report:?}");
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod graph;
pub mod models;
pub mod parser;

pub use analysis::{CollaborationAnalyzer, CollaborationReport, CollaborationRow};
pub use builder::{AuthorGraph, GraphBuilder, ProgressObserver, SkippedRecord};
pub use client::{EntrezClient, LiteratureSource, Pacer};
pub use config::{AffiliationMarkers, BreakdownMode, BuildOptions, Config};
pub use error::{ClientError, GraphError};
pub use graph::{AffiliationClass, Article, Author, AuthorRegistry, CoauthorGraph};
