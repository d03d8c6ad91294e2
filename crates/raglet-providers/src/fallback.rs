//! Deterministic fallback embedder.
//!
//! Used when no API key is configured so uploads and queries still flow
//! through the whole pipeline. The vector is a constant derived from the
//! text length, not semantically meaningful. Demo only.

use async_trait::async_trait;

use raglet_core::error::Result;
use raglet_core::traits::Embedder;

/// Length-based constant-vector embedder.
pub struct FallbackEmbedder {
    dimension: usize,
}

impl FallbackEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl Embedder for FallbackEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let value = text.len() as f32 / 100.0;
        Ok(vec![value; self.dimension])
    }
}
