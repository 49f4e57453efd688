//! In-memory full-text index over product names and categories.
//!
//! Products go in through [`ProductIndex::index`] (or an [`ingest::Ingestor`]
//! for bulk loads) and come back out of [`ProductIndex::search`], which ORs
//! fuzzy, prefix and substring matches across both fields into one ranked list.

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod ingest;
pub mod matcher;
pub mod search;

pub use engine::{BatchReport, ProductIndex};
pub use error::IndexError;
pub use index::{DocId, Field, IndexStats, InvertedIndex, Product};
pub use matcher::{MatchStrategy, ScoreWeights};
pub use search::SearchResults;
