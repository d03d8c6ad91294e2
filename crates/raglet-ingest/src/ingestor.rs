//! Chunk → embed → upsert pipeline for saved files.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use raglet_core::config::IngestConfig;
use raglet_core::error::Result;
use raglet_core::traits::{Embedder, VectorIndex};
use raglet_core::types::{SavedFile, VectorPoint};

use crate::chunker::Chunker;

/// Ingests saved files into a vector-store collection.
///
/// Intended to run as a fire-and-forget background task after the upload
/// response has been sent; the caller logs and swallows any error.
pub struct Ingestor {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chunker: Chunker,
    upsert_batch: usize,
    embedding_dimension: usize,
}

impl Ingestor {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        config: &IngestConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            chunker: Chunker::new(config.chunk_size, config.chunk_overlap),
            upsert_batch: config.upsert_batch.max(1),
            embedding_dimension: config.embedding_dimension,
        }
    }

    /// Read, chunk, embed, and upsert every file. Files that no longer
    /// exist on disk are skipped. Returns the number of points inserted.
    pub async fn ingest_files(&self, collection: &str, files: &[SavedFile]) -> Result<usize> {
        self.index
            .ensure_collection(collection, self.embedding_dimension)
            .await?;

        let mut total = 0;
        for file in files {
            let raw = match tokio::fs::read(&file.path).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path = %file.path, "skipping unreadable file: {e}");
                    continue;
                }
            };
            let text = String::from_utf8_lossy(&raw);
            let chunks = self.chunker.chunk(&text);

            let mut batch = Vec::new();
            for (chunk_index, chunk) in chunks.iter().enumerate() {
                let vector = self.embedder.embed(chunk).await?;
                batch.push(VectorPoint {
                    id: Uuid::new_v4().to_string(),
                    vector,
                    payload: json!({
                        "filename": file.filename,
                        "chunk_index": chunk_index,
                        "text": chunk,
                    }),
                });

                if batch.len() >= self.upsert_batch {
                    total += batch.len();
                    self.index
                        .upsert(collection, std::mem::take(&mut batch))
                        .await?;
                }
            }
            if !batch.is_empty() {
                total += batch.len();
                self.index.upsert(collection, batch).await?;
            }

            tracing::info!(
                filename = %file.filename,
                chunks = chunks.len(),
                collection,
                "ingested file"
            );
        }

        Ok(total)
    }
}
