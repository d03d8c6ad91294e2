//! Qdrant-backed implementation of the [`VectorIndex`] trait.
//!
//! A thin pass-through: collection lifecycle, point upsert, and
//! similarity search are all owned by Qdrant. Collections are created
//! lazily with cosine distance.

use async_trait::async_trait;
use qdrant_client::Payload;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};

use raglet_core::config::QdrantConfig;
use raglet_core::error::{RagletError, Result};
use raglet_core::traits::VectorIndex;
use raglet_core::types::{ScoredPoint, VectorPoint};

/// Vector store client backed by Qdrant (gRPC).
pub struct QdrantIndex {
    client: Qdrant,
}

impl QdrantIndex {
    pub fn connect(config: &QdrantConfig) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.qdrant_url());
        if let Some(key) = &config.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagletError::VectorStore(format!("Qdrant client init failed: {e}")))?;
        Ok(Self { client })
    }
}

fn point_id_string(id: Option<qdrant_client::qdrant::PointId>) -> String {
    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, name: &str, dimension: usize) -> Result<()> {
        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| RagletError::VectorStore(format!("collection check failed: {e}")))?;
        if exists {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| RagletError::VectorStore(format!("create collection failed: {e}")))?;
        tracing::info!(collection = name, dimension, "created Qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<VectorPoint>) -> Result<()> {
        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let payload = Payload::try_from(p.payload)
                    .map_err(|e| RagletError::VectorStore(format!("invalid payload: {e}")))?;
                Ok(PointStruct::new(p.id, p.vector, payload))
            })
            .collect::<Result<_>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points))
            .await
            .map_err(|e| RagletError::VectorStore(format!("upsert failed: {e}")))?;
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector, limit as u64).with_payload(true),
            )
            .await
            .map_err(|e| RagletError::VectorStore(format!("search failed: {e}")))?;

        let hits = response
            .result
            .into_iter()
            .map(|p| {
                let payload = serde_json::Value::Object(
                    p.payload
                        .into_iter()
                        .map(|(k, v)| (k, v.into_json()))
                        .collect(),
                );
                ScoredPoint {
                    id: point_id_string(p.id),
                    score: p.score,
                    payload,
                }
            })
            .collect();

        Ok(hits)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .health_check()
            .await
            .map_err(|e| RagletError::VectorStore(format!("Qdrant unreachable: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::PointId;

    #[test]
    fn point_id_uuid_and_num() {
        let uuid: PointId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string().into();
        assert_eq!(point_id_string(Some(uuid)), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        let num: PointId = 42u64.into();
        assert_eq!(point_id_string(Some(num)), "42");
        assert_eq!(point_id_string(None), "");
    }
}
