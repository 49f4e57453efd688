use proptest::prelude::*;
use search_core::analyzer::analyze;
use search_core::catalog::{ADJECTIVES, CATEGORIES, NOUNS};
use search_core::ingest::{load_catalog, write_catalog, Ingestor};
use search_core::{IndexError, Product, ProductIndex};
use std::io::Write;
use tempfile::tempdir;

fn p(id: u64, name: &str, category: &str) -> Product {
    Product { id, name: name.into(), category: category.into() }
}

fn ids(products: &[Product]) -> Vec<u64> {
    products.iter().map(|p| p.id).collect()
}

fn small_catalog() -> ProductIndex {
    let index = ProductIndex::new();
    index.index_batch(vec![
        p(1, "Premium Laptop", "Electronics"),
        p(2, "Basic Phone", "Electronics"),
        p(3, "Classic Watch", "Sports"),
        p(4, "Modern Headphones", "Electronics"),
        p(5, "Eco-friendly Mouse", "Home & Kitchen"),
        p(6, "Smart Speaker", "Home & Kitchen"),
    ]);
    index
}

#[test]
fn ranks_exact_then_fuzzy_then_prefix() {
    let index = ProductIndex::new();
    index.index(p(1, "Smart Watch", "Electronics")).unwrap();
    index.index(p(2, "Smart Watcher", "Electronics")).unwrap();
    index.index(p(3, "Smartx", "Electronics")).unwrap();

    let res = index.search("smart watch", 10).unwrap();
    assert_eq!(ids(&res.products), vec![1, 2, 3]);
    assert_eq!(res.total, 3);
}

#[test]
fn ties_break_by_ascending_id() {
    let index = ProductIndex::new();
    for id in [9, 4, 7] {
        index.index(p(id, "Deluxe Camera", "Electronics")).unwrap();
    }
    let res = index.search("camera", 10).unwrap();
    assert_eq!(ids(&res.products), vec![4, 7, 9]);
}

#[test]
fn blank_query_is_invalid() {
    let index = small_catalog();
    for q in ["", "   ", "\t\n"] {
        for limit in [0, 1, 50] {
            assert!(matches!(index.search(q, limit), Err(IndexError::InvalidQuery(_))));
        }
    }
}

#[test]
fn no_match_is_empty_not_error() {
    let index = small_catalog();
    let res = index.search("zzzqqqnomatch", 10).unwrap();
    assert!(res.products.is_empty());
    assert_eq!(res.total, 0);
}

#[test]
fn zero_limit_still_counts() {
    let index = small_catalog();
    let res = index.search("electronics", 0).unwrap();
    assert!(res.products.is_empty());
    assert_eq!(res.total, 3);
}

#[test]
fn fuzzy_prefix_and_substring_all_recall() {
    let index = small_catalog();
    // one edit away from "laptop"
    assert_eq!(ids(&index.search("labtop", 10).unwrap().products), vec![1]);
    // prefix of "headphones"
    assert_eq!(ids(&index.search("headph", 10).unwrap().products), vec![4]);
    // inside "headphones"
    assert_eq!(ids(&index.search("adphon", 10).unwrap().products), vec![4]);
    // "phone" is exact for 2 and a substring of "headphones" for 4
    assert_eq!(ids(&index.search("phone", 10).unwrap().products), vec![2, 4]);
}

#[test]
fn matches_either_field() {
    let index = small_catalog();
    let res = index.search("kitchen", 10).unwrap();
    assert_eq!(ids(&res.products), vec![5, 6]);
    let res = index.search("mouse", 10).unwrap();
    assert_eq!(ids(&res.products), vec![5]);
}

#[test]
fn query_is_case_insensitive() {
    let index = small_catalog();
    let lower = index.search("premium", 10).unwrap();
    let upper = index.search("PREMIUM", 10).unwrap();
    assert_eq!(lower, upper);
    assert_eq!(lower.total, 1);
}

#[test]
fn reindex_overwrites_forward_record() {
    let index = ProductIndex::new();
    index.index(p(1, "Basic Tablet", "Toys")).unwrap();
    index.index(p(1, "Advanced Tablet", "Toys")).unwrap();
    let res = index.search("tablet", 10).unwrap();
    assert_eq!(res.total, 1);
    assert_eq!(res.products[0].name, "Advanced Tablet");
    // earlier postings remain
    assert_eq!(index.search("basic", 10).unwrap().total, 1);
}

#[test]
fn one_bad_document_does_not_block_the_batch() {
    let index = ProductIndex::new();
    let batch = vec![
        p(1, "Premium Monitor", "Electronics"),
        p(0, "Broken Monitor", "Electronics"),
        p(2, "Basic Monitor", "Electronics"),
    ];
    let report = index.index_batch(batch);
    assert_eq!(report.indexed, 2);
    assert_eq!(report.failed, 1);
    let res = index.search("monitor", 10).unwrap();
    assert_eq!(ids(&res.products), vec![1, 2]);
}

#[test]
fn malformed_jsonl_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, r#"{{"id":1,"name":"Smart Phone","category":"Electronics"}}"#).unwrap();
    writeln!(f, r#"{{"id":"two","name":"Bad"}}"#).unwrap();
    writeln!(f).unwrap();
    writeln!(f, r#"{{"id":3,"name":"Classic Watch","category":"Sports"}}"#).unwrap();
    drop(f);

    let products = load_catalog(&path).unwrap();
    assert_eq!(ids(&products), vec![1, 3]);

    let index = ProductIndex::new();
    let report = Ingestor::new(index.clone()).run(products);
    assert_eq!(report.indexed, 2);
    assert_eq!(index.search("watch", 10).unwrap().total, 1);
}

#[test]
fn json_array_and_jsonl_round_trip() {
    let dir = tempdir().unwrap();
    let jsonl = dir.path().join("out/catalog.jsonl");
    let products = vec![p(1, "Modern Camera", "Electronics"), p(2, "Basic Mouse", "Toys")];
    assert_eq!(write_catalog(&jsonl, products.clone()).unwrap(), 2);
    assert_eq!(load_catalog(&jsonl).unwrap(), products);

    let json = dir.path().join("catalog.json");
    std::fs::write(&json, serde_json::to_string(&products).unwrap()).unwrap();
    assert_eq!(load_catalog(&json).unwrap(), products);
}

#[test]
fn concurrent_searches_agree() {
    let index = small_catalog();
    let expected = index.search("electronics", 10).unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let index = index.clone();
            std::thread::spawn(move || index.search("electronics", 10).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

fn vocabulary() -> Vec<String> {
    let mut words: Vec<String> = ADJECTIVES
        .iter()
        .chain(NOUNS)
        .chain(CATEGORIES)
        .flat_map(|w| analyze(w))
        .collect();
    words.sort();
    words.dedup();
    words
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec((0..ADJECTIVES.len(), 0..NOUNS.len(), 0..CATEGORIES.len()), 1..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (a, n, c))| p(i as u64 + 1, &format!("{} {}", ADJECTIVES[a], NOUNS[n]), CATEGORIES[c]))
            .collect()
    })
}

proptest! {
    #[test]
    fn total_is_independent_of_limit(products in catalog_strategy(), term in prop::sample::select(vocabulary())) {
        let index = ProductIndex::new();
        index.index_batch(products);
        let one = index.search(&term, 1).unwrap();
        let many = index.search(&term, 1000).unwrap();
        prop_assert_eq!(one.total, many.total);
        prop_assert_eq!(many.products.len(), many.total);
        prop_assert!(one.products.len() <= 1);
    }

    #[test]
    fn exact_token_matches_are_always_returned(products in catalog_strategy(), term in prop::sample::select(vocabulary())) {
        let index = ProductIndex::new();
        index.index_batch(products.clone());
        let res = index.search(&term, 1000).unwrap();
        let found = ids(&res.products);
        for product in &products {
            let has_token = analyze(&product.name).contains(&term) || analyze(&product.category).contains(&term);
            if has_token {
                prop_assert!(found.contains(&product.id), "missing {} for {}", product.id, term);
            }
        }
    }

    #[test]
    fn indexing_twice_is_idempotent(products in catalog_strategy(), term in prop::sample::select(vocabulary())) {
        let once = ProductIndex::new();
        once.index_batch(products.clone());
        let twice = ProductIndex::new();
        twice.index_batch(products.clone());
        twice.index_batch(products);

        let a = once.search(&term, 1000).unwrap();
        let b = twice.search(&term, 1000).unwrap();
        let mut seen = ids(&b.products);
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), b.products.len());
        prop_assert_eq!(a, b);
    }
}
