use axum::extract::rejection::QueryRejection;
use axum::{extract::{Path, Query, State}, routing::get, Json, Router};
use search_core::config::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use search_core::{IndexStats, Product, ProductIndex, SearchResults};
use serde::Deserialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod errors;

use errors::ApiError;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Negative values are treated as 0.
    pub limit: Option<i64>,
}

#[derive(Clone)]
pub struct AppState {
    pub index: ProductIndex,
}

pub fn build_app(index: ProductIndex) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/products/:id", get(product_handler))
        .route("/stats", get(stats_handler))
        .with_state(AppState { index })
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResults>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err(ApiError::BadRequest("Query parameter 'q' is required".into())),
    };
    let limit = params
        .limit
        .map_or(DEFAULT_SEARCH_LIMIT, |l| l.max(0) as usize)
        .min(MAX_SEARCH_LIMIT);

    let start = std::time::Instant::now();
    let index = state.index.clone();
    let q = query.clone();
    let results = tokio::task::spawn_blocking(move || index.search(&q, limit))
        .await
        .map_err(|e| ApiError::Internal(format!("Search error: {e}")))??;

    tracing::info!(
        query = %query,
        limit,
        total = results.total,
        took_ms = start.elapsed().as_millis() as u64,
        "search"
    );
    Ok(Json(results))
}

pub async fn product_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.index.get(id)?))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.stats())
}
