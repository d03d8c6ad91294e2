//! # Raglet Core
//!
//! Shared foundation for the Raglet RAG FAQ backend:
//! - [`config`]: TOML + environment configuration
//! - [`error`]: the [`RagletError`](error::RagletError) type and `Result` alias
//! - [`types`]: records exchanged between crates
//! - [`traits`]: async seams over the external services (vector store,
//!   cache, relational database, language-model API)

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::RagletConfig;
pub use error::{RagletError, Result};
