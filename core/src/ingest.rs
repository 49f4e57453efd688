//! Bulk loading: batching, progress logging, and catalog files.

use crate::config;
use crate::engine::ProductIndex;
use crate::index::Product;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Totals for one [`Ingestor::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub indexed: usize,
    pub failed: usize,
    pub batches: usize,
    /// Memory reclamation checkpoints taken, including the final one.
    pub reclaims: usize,
    pub elapsed: Duration,
}

/// Feeds products into a [`ProductIndex`] in fixed-size batches.
///
/// After every batch it logs progress (with an ETA when the total is known).
/// Every `reclaim_every` batches it reclaims spare capacity in the store, and
/// it does so once more at the end if the last batch was not a checkpoint.
/// Memory usage is logged every 5% of the expected total and at the end.
pub struct Ingestor {
    index: ProductIndex,
    batch_size: usize,
    reclaim_every: usize,
    expected_total: Option<usize>,
}

impl Ingestor {
    pub fn new(index: ProductIndex) -> Self {
        Self {
            index,
            batch_size: config::DEFAULT_BATCH_SIZE,
            reclaim_every: config::DEFAULT_RECLAIM_EVERY_BATCHES,
            expected_total: None,
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Batches between reclamation checkpoints. 0 is treated as 1.
    pub fn reclaim_every(mut self, batches: usize) -> Self {
        self.reclaim_every = batches.max(1);
        self
    }

    pub fn expected_total(mut self, total: usize) -> Self {
        self.expected_total = Some(total);
        self
    }

    pub fn run<I>(&self, products: I) -> IngestReport
    where
        I: IntoIterator<Item = Product>,
    {
        let start = Instant::now();
        let mut indexed = 0usize;
        let mut failed = 0usize;
        let mut batches = 0usize;
        let mut reclaims = 0usize;
        let mut reclaimed_last = false;
        let checkpoint = self.expected_total.map(|t| (t / 20).max(1));
        let mut next_checkpoint = checkpoint;

        let mut iter = products.into_iter();
        let mut batch: Vec<Product> = Vec::with_capacity(self.batch_size);
        loop {
            batch.extend(iter.by_ref().take(self.batch_size));
            if batch.is_empty() {
                break;
            }
            let report = self.index.index_batch(batch.drain(..));
            indexed += report.indexed;
            failed += report.failed;
            batches += 1;

            let done = indexed + failed;
            let elapsed = start.elapsed();
            match self.expected_total {
                Some(total) if total > 0 => {
                    let progress = done as f64 / total as f64 * 100.0;
                    let remaining = if done < total {
                        elapsed.mul_f64((total - done) as f64 / done as f64)
                    } else {
                        Duration::ZERO
                    };
                    tracing::info!(
                        done,
                        total,
                        "progress: {:.2}% | est. remaining: {}s",
                        progress,
                        remaining.as_secs()
                    );
                }
                _ => tracing::info!(done, elapsed_ms = elapsed.as_millis() as u64, "progress"),
            }

            reclaimed_last = batches % self.reclaim_every == 0;
            if reclaimed_last {
                self.index.reclaim();
                reclaims += 1;
            }

            if let (Some(step), Some(next)) = (checkpoint, next_checkpoint) {
                if done >= next {
                    self.log_memory();
                    next_checkpoint = Some((done / step + 1) * step);
                }
            }
        }

        if !reclaimed_last {
            self.index.reclaim();
            reclaims += 1;
        }
        let elapsed = start.elapsed();
        tracing::info!(indexed, failed, batches, reclaims, elapsed_s = elapsed.as_secs_f64(), "indexing complete");
        self.log_memory();
        IngestReport { indexed, failed, batches, reclaims, elapsed }
    }

    fn log_memory(&self) {
        let stats = self.index.stats();
        tracing::info!(
            documents = stats.documents,
            name_terms = stats.name_terms,
            category_terms = stats.category_terms,
            postings = stats.postings,
            "memory usage: ~{} MiB",
            stats.approx_heap_mib()
        );
    }
}

/// Read products from a `.jsonl` file (one object per line) or a `.json`
/// file holding an array or a single object. Malformed JSONL lines are
/// logged and skipped.
pub fn load_catalog(path: &Path) -> Result<Vec<Product>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut products = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Product>(&line) {
                Ok(product) => products.push(product),
                Err(e) => tracing::warn!(line = lineno + 1, error = %e, "skipping malformed product"),
            }
        }
        return Ok(products);
    }

    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            let mut products = Vec::with_capacity(arr.len());
            for (i, v) in arr.into_iter().enumerate() {
                match serde_json::from_value::<Product>(v) {
                    Ok(product) => products.push(product),
                    Err(e) => tracing::warn!(entry = i, error = %e, "skipping malformed product"),
                }
            }
            Ok(products)
        }
        serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(json)?]),
        _ => anyhow::bail!("{}: expected a product object or array", path.display()),
    }
}

/// Write products as JSONL.
pub fn write_catalog<I>(path: &Path, products: I) -> Result<usize>
where
    I: IntoIterator<Item = Product>,
{
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let mut out = BufWriter::new(File::create(path).with_context(|| format!("creating {}", path.display()))?);
    let mut n = 0;
    for product in products {
        serde_json::to_writer(&mut out, &product)?;
        out.write_all(b"\n")?;
        n += 1;
    }
    out.flush()?;
    Ok(n)
}
