use anyhow::Result;
use clap::{Parser, Subcommand};
use search_core::catalog::CatalogGenerator;
use search_core::config;
use search_core::ingest::{load_catalog, write_catalog, Ingestor};
use search_core::ProductIndex;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Generate product catalogs and query them offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic catalog as JSONL
    Generate {
        /// Output JSONL file
        #[arg(long)]
        output: PathBuf,
        /// Number of products
        #[arg(long, default_value_t = config::DEFAULT_TOTAL_PRODUCTS)]
        total: usize,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Index a catalog file and run a single search against it
    Query {
        /// Input catalog (.json or .jsonl)
        #[arg(long)]
        input: PathBuf,
        /// Query text
        #[arg(long)]
        q: String,
        /// Maximum number of products to print
        #[arg(long, default_value_t = config::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
        /// Products indexed per batch
        #[arg(long, default_value_t = config::DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { output, total, seed } => {
            let written = write_catalog(&output, CatalogGenerator::new(total, seed))?;
            tracing::info!(output = %output.display(), written, "catalog written");
            Ok(())
        }
        Commands::Query { input, q, limit, batch_size } => {
            let products = load_catalog(&input)?;
            let index = ProductIndex::new();
            let total = products.len();
            Ingestor::new(index.clone()).batch_size(batch_size).expected_total(total).run(products);
            let results = index.search(&q, limit)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
    }
}
