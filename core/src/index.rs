use crate::error::{IndexError, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::mem::size_of;

pub type DocId = u64;

lazy_static! {
    static ref NO_POSTINGS: HashSet<DocId> = HashSet::new();
}

/// A catalog entry. `id` is assigned by the caller and must be positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: DocId,
    pub name: String,
    pub category: String,
}

/// Indexed text fields of a [`Product`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Category,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Name, Field::Category];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Category => "category",
        }
    }

    /// The raw text of this field on `product`.
    pub fn text<'a>(&self, product: &'a Product) -> &'a str {
        match self {
            Field::Name => &product.name,
            Field::Category => &product.category,
        }
    }
}

/// More than twice the capacity the contents need. Tighter containers are
/// left alone so the next insert does not immediately regrow them.
fn has_slack(len: usize, capacity: usize) -> bool {
    capacity > len.saturating_mul(2)
}

/// Token → posting set for a single field.
#[derive(Debug, Default)]
struct FieldIndex {
    postings: HashMap<String, HashSet<DocId>>,
}

impl FieldIndex {
    fn add(&mut self, doc_id: DocId, token: &str) {
        match self.postings.get_mut(token) {
            Some(set) => {
                set.insert(doc_id);
            }
            None => {
                self.postings.insert(token.to_string(), HashSet::from([doc_id]));
            }
        }
    }

    fn posting_entries(&self) -> usize {
        self.postings.values().map(HashSet::len).sum()
    }

    fn approx_heap_bytes(&self) -> usize {
        let mut total = self.postings.capacity() * (size_of::<String>() + size_of::<HashSet<DocId>>());
        for (term, set) in &self.postings {
            total += term.capacity();
            total += set.capacity() * (size_of::<DocId>() + 1);
        }
        total
    }

    fn shrink(&mut self) {
        if has_slack(self.postings.len(), self.postings.capacity()) {
            self.postings.shrink_to_fit();
        }
        for set in self.postings.values_mut() {
            if has_slack(set.len(), set.capacity()) {
                set.shrink_to_fit();
            }
        }
    }
}

/// Snapshot of index size, used for memory-usage logging and `/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub name_terms: usize,
    pub category_terms: usize,
    /// Sum of posting set sizes over both fields.
    pub postings: usize,
    pub approx_heap_bytes: usize,
}

impl IndexStats {
    pub fn approx_heap_mib(&self) -> usize {
        self.approx_heap_bytes / 1024 / 1024
    }
}

/// In-memory inverted index over product names and categories, plus the
/// forward store used to materialize hits.
///
/// Append-only: re-adding a token for a document is a no-op and nothing is
/// ever removed from a posting set.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    name: FieldIndex,
    category: FieldIndex,
    docs: HashMap<DocId, Product>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(&self, field: Field) -> &FieldIndex {
        match field {
            Field::Name => &self.name,
            Field::Category => &self.category,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldIndex {
        match field {
            Field::Name => &mut self.name,
            Field::Category => &mut self.category,
        }
    }

    /// Add `doc_id` to the posting set of every token under `field`.
    pub fn put<S: AsRef<str>>(&mut self, doc_id: DocId, field: Field, tokens: &[S]) {
        let index = self.field_mut(field);
        for token in tokens {
            index.add(doc_id, token.as_ref());
        }
    }

    /// Replace the forward record for `doc_id`.
    pub fn store_forward(&mut self, doc_id: DocId, product: Product) {
        self.docs.insert(doc_id, product);
    }

    /// Documents whose `field` contains `token`. Unknown tokens yield an empty set.
    pub fn postings_for(&self, field: Field, token: &str) -> &HashSet<DocId> {
        self.field(field).postings.get(token).unwrap_or(&NO_POSTINGS)
    }

    pub fn forward_record(&self, doc_id: DocId) -> Result<&Product> {
        self.docs.get(&doc_id).ok_or(IndexError::NotFound(doc_id))
    }

    /// Distinct tokens indexed under `field`, in no particular order.
    pub fn vocabulary(&self, field: Field) -> impl Iterator<Item = &str> + '_ {
        self.field(field).postings.keys().map(String::as_str)
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        let mut approx_heap_bytes = self.name.approx_heap_bytes() + self.category.approx_heap_bytes();
        approx_heap_bytes += self.docs.capacity() * (size_of::<DocId>() + size_of::<Product>());
        for product in self.docs.values() {
            approx_heap_bytes += product.name.capacity() + product.category.capacity();
        }
        IndexStats {
            documents: self.docs.len(),
            name_terms: self.name.postings.len(),
            category_terms: self.category.postings.len(),
            postings: self.name.posting_entries() + self.category.posting_entries(),
            approx_heap_bytes,
        }
    }

    /// Release spare capacity left behind by map growth during bulk loads.
    /// Cheap to call after every batch: only oversized containers are shrunk.
    pub fn reclaim(&mut self) {
        self.name.shrink();
        self.category.shrink();
        if has_slack(self.docs.len(), self.docs.capacity()) {
            self.docs.shrink_to_fit();
        }
    }
}
