//! Locus graph REST API server.
//!
//! Endpoints:
//! - GET  /api/health                       - Health check
//! - POST /api/locus                        - Resolve a locus graph
//! - POST /api/locus/table                  - Paginated association rows for an interval
//! - GET  /api/diseases/:efo_id/table      - Paginated association rows for a disease
//! - GET  /api/search?q=rs123               - Exact-match variant search
//! - GET  /api/genes/:gene_id/location      - Gene location metadata
//! - GET  /api/variants/:variant_id/location - Variant location lookup
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=sqlite://postgap.db?mode=ro cargo run --bin locus_server --features server
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use locus_graph::{
    AnnotationCache, AnnotationConfig, DatabaseConfig, DatabaseManager, DiseaseTableQuery,
    EnsemblClient, GeneAnnotation, LocusError, LocusGraph, LocusQuery, LocusService,
    LocusTableQuery, SearchHit, TableMapping, TableView, VariantLocationInfo,
};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
struct AppState {
    service: Arc<LocusService>,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
}

#[derive(Deserialize)]
struct PageParams {
    #[serde(default)]
    offset: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    25
}

fn error_response(error: LocusError) -> (StatusCode, String) {
    let status = match &error {
        LocusError::Filter(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn locus(
    State(state): State<AppState>,
    Json(query): Json<LocusQuery>,
) -> Result<Json<LocusGraph>, (StatusCode, String)> {
    state
        .service
        .locus_graph(&query)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn locus_table(
    State(state): State<AppState>,
    Json(query): Json<LocusTableQuery>,
) -> Result<Json<TableView>, (StatusCode, String)> {
    state
        .service
        .locus_table(&query)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn disease_table(
    State(state): State<AppState>,
    Path(efo_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<TableView>, (StatusCode, String)> {
    let query = DiseaseTableQuery {
        disease_id: efo_id,
        offset: page.offset,
        limit: page.limit,
    };
    state
        .service
        .disease_table(&query)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, (StatusCode, String)> {
    state
        .service
        .search(&params.q)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn gene_location(
    State(state): State<AppState>,
    Path(gene_id): Path<String>,
) -> Result<Json<Option<GeneAnnotation>>, (StatusCode, String)> {
    state
        .service
        .gene_location(&gene_id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn variant_location(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
) -> Result<Json<Option<VariantLocationInfo>>, (StatusCode, String)> {
    state
        .service
        .variant_location(&variant_id)
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db = DatabaseManager::new(DatabaseConfig::default()).await?;
    let source = Arc::new(EnsemblClient::new(AnnotationConfig::default())?);
    let annotations = Arc::new(AnnotationCache::new(source));
    let service = Arc::new(LocusService::new(
        db.pool().clone(),
        TableMapping::grch38(),
        annotations,
    ));

    let state = AppState { service };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/locus", post(locus))
        .route("/api/locus/table", post(locus_table))
        .route("/api/diseases/:efo_id/table", get(disease_table))
        .route("/api/search", get(search))
        .route("/api/genes/:gene_id/location", get(gene_location))
        .route("/api/variants/:variant_id/location", get(variant_location))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = std::env::var("LOCUS_SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
    tracing::info!("locus_server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
