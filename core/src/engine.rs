use crate::analyzer::analyze;
use crate::error::{IndexError, Result};
use crate::index::{Field, IndexStats, InvertedIndex, Product};
use crate::matcher::ScoreWeights;
use crate::search::{self, SearchResults};
use parking_lot::RwLock;
use std::sync::Arc;

/// Outcome of [`ProductIndex::index_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub indexed: usize,
    pub failed: usize,
}

/// Shared handle to a product index.
///
/// Clones share the same store. Indexing takes the write lock; searches take
/// the read lock and run concurrently with each other.
#[derive(Clone, Default)]
pub struct ProductIndex {
    inner: Arc<RwLock<InvertedIndex>>,
    weights: ScoreWeights,
}

impl ProductIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { inner: Arc::default(), weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Analyze and add one product. Re-indexing an id replaces its stored
    /// record; its earlier postings stay in place.
    pub fn index(&self, product: Product) -> Result<()> {
        if product.id == 0 {
            return Err(IndexError::IndexingFailure { id: 0, reason: "id must be positive".into() });
        }
        let name_tokens = analyze(&product.name);
        let category_tokens = analyze(&product.category);

        let mut idx = self.inner.write();
        idx.put(product.id, Field::Name, &name_tokens);
        idx.put(product.id, Field::Category, &category_tokens);
        idx.store_forward(product.id, product);
        Ok(())
    }

    /// Index every product, logging and skipping the ones that fail.
    pub fn index_batch<I>(&self, products: I) -> BatchReport
    where
        I: IntoIterator<Item = Product>,
    {
        let mut report = BatchReport::default();
        for product in products {
            let id = product.id;
            match self.index(product) {
                Ok(()) => report.indexed += 1,
                Err(e) => {
                    tracing::warn!(id, error = %e, "skipping product");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Rank products matching `query` and return the first `limit` of them.
    pub fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        if query.trim().is_empty() {
            return Err(IndexError::InvalidQuery("query text is blank".into()));
        }
        let idx = self.inner.read();
        search::search(&idx, query, limit, &self.weights)
    }

    pub fn get(&self, id: u64) -> Result<Product> {
        self.inner.read().forward_record(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().num_docs()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats()
    }

    /// Memory checkpoint between ingestion batches.
    pub fn reclaim(&self) {
        self.inner.write().reclaim();
    }
}
