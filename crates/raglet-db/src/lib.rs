//! PostgreSQL-backed implementation of the [`RelationalStore`] trait.
//!
//! Two flat tables with no invariants beyond primary-key uniqueness:
//!
//! - `items`: demo CRUD rows
//! - `query_history`: one row per answered question, written by a
//!   fire-and-forget background task after `/api/ask`
//!
//! The schema is created idempotently at startup; there is no migration
//! history to manage for two demo tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row, postgres::PgRow};

use raglet_core::config::PostgresConfig;
use raglet_core::error::{RagletError, Result};
use raglet_core::traits::RelationalStore;
use raglet_core::types::{HistoryRecord, HistoryRow, Item, NewItem};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id          SERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS query_history (
    id          SERIAL PRIMARY KEY,
    question    TEXT NOT NULL,
    answer      TEXT NOT NULL,
    tokens      INTEGER,
    sources     JSONB,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

/// Relational store backed by a Postgres connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and ensure the schema exists.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url())
            .await
            .map_err(|e| RagletError::Database(format!("Postgres connect failed: {e}")))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool (used by tests against a scratch database).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| RagletError::Database(format!("schema setup failed: {e}")))?;
        tracing::info!("database schema ready");
        Ok(())
    }
}

fn item_from_row(row: &PgRow) -> Item {
    Item {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

fn sources_from_json(value: Option<serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

#[async_trait]
impl RelationalStore for PgStore {
    async fn insert_item(&self, item: NewItem) -> Result<Item> {
        let row = sqlx::query(
            "INSERT INTO items (name, description) VALUES ($1, $2)
             RETURNING id, name, description, created_at",
        )
        .bind(&item.name)
        .bind(&item.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RagletError::Database(format!("insert item failed: {e}")))?;

        Ok(item_from_row(&row))
    }

    async fn list_items(&self, skip: i64, limit: i64) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at FROM items
             ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RagletError::Database(format!("list items failed: {e}")))?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn get_item(&self, id: i32) -> Result<Option<Item>> {
        let row = sqlx::query("SELECT id, name, description, created_at FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RagletError::Database(format!("get item failed: {e}")))?;

        Ok(row.as_ref().map(item_from_row))
    }

    async fn insert_history(&self, record: HistoryRecord) -> Result<()> {
        let sources = serde_json::to_value(&record.sources)?;
        sqlx::query(
            "INSERT INTO query_history (question, answer, tokens, sources)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&record.question)
        .bind(&record.answer)
        .bind(record.tokens)
        .bind(sources)
        .execute(&self.pool)
        .await
        .map_err(|e| RagletError::Database(format!("insert history failed: {e}")))?;
        Ok(())
    }

    async fn list_history(&self, limit: i64) -> Result<Vec<HistoryRow>> {
        let rows = sqlx::query(
            "SELECT id, question, answer, tokens, sources, created_at
             FROM query_history ORDER BY id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RagletError::Database(format!("list history failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|row| HistoryRow {
                id: row.get("id"),
                question: row.get("question"),
                answer: row.get("answer"),
                tokens: row.get("tokens"),
                sources: sources_from_json(row.get("sources")),
                created_at: row.get::<DateTime<Utc>, _>("created_at"),
            })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RagletError::Database(format!("Postgres unreachable: {e}")))?;
        Ok(())
    }
}
