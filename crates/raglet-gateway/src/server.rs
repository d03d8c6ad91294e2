//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use raglet_core::RagletConfig;
use raglet_core::traits::{Cache, ChatModel, Embedder, RelationalStore, VectorIndex};
use raglet_ingest::{FileSaver, Ingestor};

/// Shared state for the gateway server.
///
/// All external services sit behind trait objects so handlers can be
/// unit-tested against in-memory fakes.
pub struct AppState {
    pub config: RagletConfig,
    pub db: Arc<dyn RelationalStore>,
    pub cache: Arc<dyn Cache>,
    pub index: Arc<dyn VectorIndex>,
    pub embedder: Arc<dyn Embedder>,
    pub chat: Arc<dyn ChatModel>,
    pub saver: Arc<FileSaver>,
    pub ingestor: Arc<Ingestor>,
}

impl AppState {
    pub fn new(
        config: RagletConfig,
        db: Arc<dyn RelationalStore>,
        cache: Arc<dyn Cache>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        let saver = Arc::new(FileSaver::new(config.ingest.media_root.clone()));
        let ingestor = Arc::new(Ingestor::new(
            embedder.clone(),
            index.clone(),
            &config.ingest,
        ));
        Self {
            config,
            db,
            cache,
            index,
            embedder,
            chat,
            saver,
            ingestor,
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(super::routes::api_health))
        .route("/health/postgres", get(super::routes::postgres_health))
        .route("/health/redis", get(super::routes::redis_health))
        .route("/health/qdrant", get(super::routes::qdrant_health))
        // Item CRUD (relational demo)
        .route("/items", post(super::routes::create_item))
        .route("/items", get(super::routes::list_items))
        .route("/items/{id}", get(super::routes::get_item))
        // Cache passthrough
        .route("/cache/{key}", post(super::routes::set_cache))
        .route("/cache/{key}", get(super::routes::get_cache))
        .route("/cache/{key}", delete(super::routes::delete_cache))
        // Vector passthrough
        .route("/vectors/add", post(super::routes::add_vectors))
        .route("/vectors/query", post(super::routes::query_vectors))
        // RAG core
        .route("/documents", post(super::routes::upload_documents))
        .route("/ask", post(super::routes::ask))
        .route("/history", get(super::routes::list_history));

    Router::new()
        .route("/health", get(super::routes::health_check))
        .nest("/api", api)
        .layer(
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::DELETE,
                ])
                .allow_headers(Any)
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until it exits.
pub async fn start(state: Arc<AppState>) -> raglet_core::Result<()> {
    let addr = format!(
        "{}:{}",
        state.config.gateway.host, state.config.gateway.port
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("gateway listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
