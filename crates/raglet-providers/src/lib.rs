//! Language-model API clients.
//!
//! A single [`OpenAiClient`] handles both chat completions and embeddings
//! for any OpenAI-compatible API; providers differ only by endpoint URL
//! and API key. [`FallbackEmbedder`] supplies deterministic vectors when
//! no API key is configured, so the service stays exercisable end-to-end
//! without credentials.

mod fallback;
mod openai;

pub use fallback::FallbackEmbedder;
pub use openai::OpenAiClient;
