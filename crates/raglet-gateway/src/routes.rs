//! API route handlers for the gateway.

use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use raglet_core::error::RagletError;
use raglet_core::types::{HistoryRecord, HistoryRow, Item, NewItem, VectorPoint};

use super::error::ApiError;
use super::server::AppState;

/// Short request id: first 8 hex chars of SHA-256(question).
fn request_id(question: &str) -> String {
    let digest = Sha256::digest(question.as_bytes());
    digest[..4].iter().map(|b| format!("{b:02x}")).collect()
}

/// Assemble the retrieval prompt: numbered sources, then the question.
fn build_prompt(question: &str, contexts: &[String]) -> String {
    let mut prompt = String::from(
        "You are a helpful assistant. Use only the following sources to answer \
         the question. If the answer is not found, say you don't know.\n\n",
    );
    for (i, context) in contexts.iter().enumerate() {
        prompt.push_str(&format!("Source {}:\n{}\n\n", i + 1, context));
    }
    prompt.push_str(&format!("Question: {question}\nAnswer:"));
    prompt
}

// ---- Health ----

/// Public liveness endpoint.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "raglet",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn api_health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn postgres_health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.db.ping().await?;
    Ok(Json(json!({"status": "ok", "service": "postgres"})))
}

pub async fn redis_health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.cache.ping().await?;
    Ok(Json(json!({"status": "ok", "service": "redis"})))
}

pub async fn qdrant_health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.index.ping().await?;
    Ok(Json(json!({"status": "ok", "service": "qdrant"})))
}

// ---- Item CRUD (relational demo) ----

#[derive(Debug, Deserialize)]
pub struct ListItemsParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_item_limit")]
    pub limit: i64,
}

fn default_item_limit() -> i64 {
    10
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(item): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    if item.name.trim().is_empty() {
        return Err(RagletError::BadRequest("item name must not be empty".into()).into());
    }
    let created = state.db.insert_item(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListItemsParams>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state
        .db
        .list_items(params.skip.max(0), params.limit.clamp(0, 100))
        .await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Item>, ApiError> {
    match state.db.get_item(id).await? {
        Some(item) => Ok(Json(item)),
        None => Err(RagletError::NotFound(format!("item {id} not found")).into()),
    }
}

// ---- Cache passthrough ----

#[derive(Debug, Deserialize)]
pub struct CacheSetRequest {
    pub value: String,
    #[serde(default)]
    pub ttl: Option<u64>,
}

pub async fn set_cache(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(req): Json<CacheSetRequest>,
) -> Result<Json<Value>, ApiError> {
    state.cache.set(&key, &req.value, req.ttl).await?;
    Ok(Json(json!({"key": key, "value": req.value, "ttl": req.ttl})))
}

pub async fn get_cache(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.cache.get(&key).await? {
        Some(value) => Ok(Json(json!({"key": key, "value": value}))),
        None => Err(RagletError::NotFound("Key not found in cache".into()).into()),
    }
}

pub async fn delete_cache(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.cache.delete(&key).await?;
    Ok(Json(json!({"ok": true, "key": key})))
}

// ---- Vector passthrough ----

#[derive(Debug, Deserialize)]
pub struct VectorAddRequest {
    pub collection_name: String,
    pub documents: Vec<String>,
    pub ids: Vec<String>,
    #[serde(default)]
    pub embeddings: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Deserialize)]
pub struct VectorQueryRequest {
    pub collection_name: String,
    #[serde(default)]
    pub query_texts: Option<Vec<String>>,
    #[serde(default)]
    pub query_embeddings: Option<Vec<Vec<f32>>>,
    #[serde(default = "default_n_results")]
    pub n_results: usize,
}

fn default_n_results() -> usize {
    5
}

/// Add documents to a vector collection. Missing embeddings are produced
/// by the configured embedder. Qdrant point ids must be UUIDs, so the
/// client id is hashed into a deterministic UUID (and kept in the payload
/// as `doc_id`); re-adding the same id overwrites the existing point.
pub async fn add_vectors(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VectorAddRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.documents.len() != req.ids.len() {
        return Err(RagletError::BadRequest(format!(
            "documents and ids must have the same length. Got {} documents and {} ids.",
            req.documents.len(),
            req.ids.len()
        ))
        .into());
    }
    if let Some(embeddings) = &req.embeddings {
        if embeddings.len() != req.documents.len() {
            return Err(RagletError::BadRequest(
                "embeddings must match documents in length".into(),
            )
            .into());
        }
    }

    let embeddings = match req.embeddings {
        Some(embeddings) => embeddings,
        None => {
            let mut embeddings = Vec::with_capacity(req.documents.len());
            for doc in &req.documents {
                embeddings.push(state.embedder.embed(doc).await?);
            }
            embeddings
        }
    };

    let dimension = embeddings
        .first()
        .map(|e| e.len())
        .unwrap_or(state.config.ingest.embedding_dimension);
    state
        .index
        .ensure_collection(&req.collection_name, dimension)
        .await?;

    let points: Vec<VectorPoint> = req
        .documents
        .iter()
        .zip(req.ids.iter())
        .zip(embeddings)
        .map(|((doc, id), vector)| VectorPoint {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes()).to_string(),
            vector,
            payload: json!({"doc_id": id, "text": doc}),
        })
        .collect();
    let added = points.len();
    if added > 0 {
        state.index.upsert(&req.collection_name, points).await?;
    }

    Ok(Json(json!({
        "ok": true,
        "collection": req.collection_name,
        "added": added,
    })))
}

/// Query a vector collection with either raw embeddings or texts that
/// get embedded first.
pub async fn query_vectors(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VectorQueryRequest>,
) -> Result<Json<Value>, ApiError> {
    let vectors = if let Some(embeddings) = req.query_embeddings {
        embeddings
    } else if let Some(texts) = req.query_texts {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in &texts {
            vectors.push(state.embedder.embed(text).await?);
        }
        vectors
    } else {
        return Err(RagletError::BadRequest(
            "Must provide either query_texts or query_embeddings".into(),
        )
        .into());
    };

    let mut results = Vec::with_capacity(vectors.len());
    for vector in vectors {
        let hits = state
            .index
            .search(&req.collection_name, vector, req.n_results)
            .await?;
        results.push(hits);
    }

    Ok(Json(json!({"ok": true, "results": results})))
}

// ---- Documents & ask (RAG core) ----

/// Accept uploaded files from multipart form-data, save them, and
/// schedule background ingestion into the vector store. Scheduling never
/// fails the request; ingestion errors are logged and swallowed.
pub async fn upload_documents(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut saved = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RagletError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        // Only file parts carry a filename; plain form values are skipped.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let name = field.name().unwrap_or("file").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| RagletError::BadRequest(format!("failed to read upload: {e}")))?;
        let file = state.saver.save(&name, Some(&filename), &data).await?;
        saved.push(file);
    }

    tracing::info!(files = saved.len(), "saved uploaded documents");

    let ingestor = state.ingestor.clone();
    let collection = state.config.ingest.default_collection.clone();
    let files = saved.clone();
    tokio::spawn(async move {
        match ingestor.ingest_files(&collection, &files).await {
            Ok(points) => {
                tracing::info!(points, collection = %collection, "background ingestion complete");
            }
            Err(e) => tracing::warn!("background ingestion failed: {e}"),
        }
    });

    Ok(Json(json!({"ok": true, "saved": saved})))
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default = "default_collection")]
    pub collection_name: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

fn default_collection() -> String {
    "default".into()
}

fn default_top_k() -> usize {
    5
}

fn default_true() -> bool {
    true
}

/// Answer a question: cache check → embed → similarity search → prompt →
/// chat completion → respond, then best-effort cache and background
/// history writes.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(RagletError::BadRequest("question must not be empty".into()).into());
    }

    let qid = request_id(&req.question);
    let start = Instant::now();
    tracing::info!(id = %qid, collection = %req.collection_name, top_k = req.top_k, "ask request");

    let cache_key = format!(
        "{}:{}:{}",
        state.config.cache.prefix, req.collection_name, qid
    );

    if req.use_cache {
        match state.cache.get(&cache_key).await {
            Ok(Some(cached)) => match serde_json::from_str::<Value>(&cached) {
                Ok(response) => {
                    tracing::info!(id = %qid, key = %cache_key, "cache hit");
                    return Ok(Json(response));
                }
                Err(_) => {
                    // Corrupt entry: drop it and answer fresh.
                    tracing::warn!(id = %qid, key = %cache_key, "corrupt cache entry, deleting");
                    if let Err(e) = state.cache.delete(&cache_key).await {
                        tracing::warn!(id = %qid, "cache delete failed: {e}");
                    }
                }
            },
            Ok(None) => tracing::debug!(id = %qid, key = %cache_key, "cache miss"),
            Err(e) => tracing::warn!(id = %qid, "cache lookup failed: {e}"),
        }
    }

    let vector = state.embedder.embed(&req.question).await?;
    let hits = state
        .index
        .search(&req.collection_name, vector, req.top_k)
        .await?;
    tracing::info!(id = %qid, hits = hits.len(), "similarity search done");

    let contexts: Vec<String> = hits.iter().map(|h| h.context_text()).collect();
    let sources: Vec<String> = hits.iter().map(|h| h.source_label()).collect();

    let prompt = build_prompt(&req.question, &contexts);
    let outcome = state.chat.complete(&prompt).await?;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(id = %qid, tokens = ?outcome.total_tokens, elapsed_ms, "answer ready");

    let response = json!({
        "answer": outcome.answer,
        "sources": sources,
        "tokens": outcome.total_tokens,
        "time_ms": elapsed_ms,
    });

    if req.use_cache {
        let ttl = state.config.cache.ttl_seconds;
        if let Err(e) = state
            .cache
            .set(&cache_key, &response.to_string(), Some(ttl))
            .await
        {
            tracing::warn!(id = %qid, "cache write failed: {e}");
        }
    }

    let db = state.db.clone();
    let record = HistoryRecord {
        question: req.question,
        answer: outcome.answer,
        tokens: outcome.total_tokens.map(|t| t as i32),
        sources,
    };
    tokio::spawn(async move {
        if let Err(e) = db.insert_history(record).await {
            tracing::warn!("history save failed: {e}");
        }
    });

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    50
}

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryRow>>, ApiError> {
    let rows = state.db.list_history(params.limit.clamp(0, 500)).await?;
    Ok(Json(rows))
}
