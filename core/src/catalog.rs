//! Synthetic product catalog.

use crate::index::{DocId, Product};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const CATEGORIES: &[&str] = &[
    "Electronics", "Clothing", "Books", "Home & Kitchen", "Sports",
    "Toys", "Beauty", "Automotive", "Garden", "Health",
];

pub const ADJECTIVES: &[&str] = &[
    "Premium", "Deluxe", "Essential", "Basic", "Professional",
    "Advanced", "Smart", "Classic", "Modern", "Eco-friendly",
];

pub const NOUNS: &[&str] = &[
    "Laptop", "Phone", "Camera", "Watch", "Headphones",
    "Speaker", "Tablet", "Monitor", "Keyboard", "Mouse",
];

fn pick<'a, R: Rng + ?Sized>(words: &[&'a str], rng: &mut R) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

/// A product named "{adjective} {noun}" in a random category.
pub fn generate_product<R: Rng + ?Sized>(id: DocId, rng: &mut R) -> Product {
    let adjective = pick(ADJECTIVES, rng);
    let noun = pick(NOUNS, rng);
    Product {
        id,
        name: format!("{adjective} {noun}"),
        category: pick(CATEGORIES, rng).to_string(),
    }
}

/// Yields `total` products with ids `1..=total`.
pub struct CatalogGenerator {
    rng: StdRng,
    next_id: DocId,
    total: usize,
}

impl CatalogGenerator {
    /// Reproducible catalog for a given seed.
    pub fn seeded(total: usize, seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), next_id: 1, total }
    }

    pub fn from_entropy(total: usize) -> Self {
        Self { rng: StdRng::from_entropy(), next_id: 1, total }
    }

    pub fn new(total: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(total, seed),
            None => Self::from_entropy(total),
        }
    }
}

impl Iterator for CatalogGenerator {
    type Item = Product;

    fn next(&mut self) -> Option<Product> {
        if self.next_id as usize > self.total {
            return None;
        }
        let product = generate_product(self.next_id, &mut self.rng);
        self.next_id += 1;
        Some(product)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let produced = (self.next_id - 1) as usize;
        let left = self.total.saturating_sub(produced);
        (left, Some(left))
    }
}

impl ExactSizeIterator for CatalogGenerator {}
