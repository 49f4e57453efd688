use criterion::{criterion_group, criterion_main, Criterion};
use search_core::analyzer::analyze;
use search_core::catalog::CatalogGenerator;
use search_core::ProductIndex;

fn bench_analyze(c: &mut Criterion) {
    let text = "Eco-friendly Headphones | Home & Kitchen | Professional Keyboard";
    c.bench_function("analyze_product_text", |b| b.iter(|| analyze(text)));
}

fn bench_search(c: &mut Criterion) {
    let index = ProductIndex::new();
    index.index_batch(CatalogGenerator::seeded(50_000, 1));
    c.bench_function("search_fuzzy_term", |b| b.iter(|| index.search("wtch", 50)));
    c.bench_function("search_two_terms", |b| b.iter(|| index.search("smart watch", 50)));
}

criterion_group!(benches, bench_analyze, bench_search);
criterion_main!(benches);
