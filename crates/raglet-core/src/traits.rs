//! Async seams over the external services.
//!
//! Every external system Raglet talks to sits behind one of these traits
//! so route handlers can be exercised against in-memory fakes. The real
//! implementations live in the `raglet-providers`, `raglet-index`,
//! `raglet-cache`, and `raglet-db` crates.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatOutcome, HistoryRecord, HistoryRow, Item, NewItem, ScoredPoint, VectorPoint};

/// Produces an embedding vector for a piece of text.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Generates a chat completion for a prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<ChatOutcome>;
}

/// Vector similarity search (Qdrant in production).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection if it does not exist (idempotent).
    async fn ensure_collection(&self, name: &str, dimension: usize) -> Result<()>;

    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> Result<()>;

    async fn search(&self, collection: &str, vector: Vec<f32>, limit: usize)
        -> Result<Vec<ScoredPoint>>;

    /// Liveness probe.
    async fn ping(&self) -> Result<()>;
}

/// Key/value cache with optional expiry (Redis in production).
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

/// Relational persistence (Postgres in production).
#[async_trait]
pub trait RelationalStore: Send + Sync {
    async fn insert_item(&self, item: NewItem) -> Result<Item>;

    async fn list_items(&self, skip: i64, limit: i64) -> Result<Vec<Item>>;

    async fn get_item(&self, id: i32) -> Result<Option<Item>>;

    async fn insert_history(&self, record: HistoryRecord) -> Result<()>;

    async fn list_history(&self, limit: i64) -> Result<Vec<HistoryRow>>;

    /// Liveness probe (`SELECT 1`).
    async fn ping(&self) -> Result<()>;
}
