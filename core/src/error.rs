use crate::DocId;
use thiserror::Error;

/// Errors surfaced by the index and query engine.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Blank or empty query text. Caller error, never retried.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Forward-record lookup for an id that was never indexed.
    #[error("document {0} not found")]
    NotFound(DocId),

    /// The document was rejected before touching the store.
    #[error("failed to index document {id}: {reason}")]
    IndexingFailure { id: DocId, reason: String },

    /// Query execution could not complete.
    #[error("search failed: {0}")]
    SearchFailure(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
