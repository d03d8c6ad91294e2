//! Document ingestion pipeline.
//!
//! Uploaded files are saved under the media root ([`FileSaver`]), then a
//! background task reads each file, splits it into overlapping chunks
//! ([`Chunker`]), embeds every chunk, and upserts the points into the
//! vector store in batches ([`Ingestor`]).

mod chunker;
mod ingestor;
mod saver;

pub use chunker::Chunker;
pub use ingestor::Ingestor;
pub use saver::FileSaver;
