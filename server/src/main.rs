use anyhow::Result;
use clap::Parser;
use search_core::catalog::CatalogGenerator;
use search_core::config;
use search_core::ingest::{load_catalog, IngestReport, Ingestor};
use search_core::ProductIndex;
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server", about = "Serve product search over HTTP")]
struct Args {
    /// Host to bind
    #[arg(long, default_value = config::DEFAULT_HOST)]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = config::DEFAULT_PORT)]
    port: u16,
    /// Load products from a .json/.jsonl file instead of generating them
    #[arg(long)]
    input: Option<PathBuf>,
    /// Number of products to generate
    #[arg(long, default_value_t = config::DEFAULT_TOTAL_PRODUCTS)]
    total: usize,
    /// Seed for the generated catalog (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Products indexed per batch
    #[arg(long, default_value_t = config::DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Seconds to wait for in-flight requests on shutdown
    #[arg(long, default_value_t = config::DEFAULT_SHUTDOWN_TIMEOUT_SECS)]
    shutdown_timeout: u64,
}

fn build_index(args: &Args) -> Result<(ProductIndex, IngestReport)> {
    let index = ProductIndex::new();
    let ingestor = Ingestor::new(index.clone()).batch_size(args.batch_size);
    let report = match &args.input {
        Some(path) => {
            let products = load_catalog(path)?;
            tracing::info!(path = %path.display(), products = products.len(), "loaded catalog");
            let total = products.len();
            ingestor.expected_total(total).run(products)
        }
        None => {
            tracing::info!(total = args.total, batch_size = args.batch_size, "generating and indexing products");
            ingestor
                .expected_total(args.total)
                .run(CatalogGenerator::new(args.total, args.seed))
        }
    };
    Ok((index, report))
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    // The index must be complete before the listener accepts anything.
    let (index, args) = tokio::task::spawn_blocking(move || build_index(&args).map(|(index, _)| (index, args))).await??;

    let app = build_app(index);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    let shutdown = Arc::new(Notify::new());
    let mut server = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.notified().await })
                .await
        }
    });

    tokio::select! {
        res = &mut server => {
            res??;
            return Ok(());
        }
        _ = wait_for_signal() => {}
    }

    tracing::info!("server is shutting down, draining in-flight requests");
    shutdown.notify_one();
    let deadline = Duration::from_secs(args.shutdown_timeout);
    match tokio::time::timeout(deadline, server).await {
        Ok(res) => res??,
        Err(_) => tracing::warn!(timeout_s = args.shutdown_timeout, "shutdown deadline elapsed, dropping open connections"),
    }
    tracing::info!("server stopped");
    Ok(())
}
