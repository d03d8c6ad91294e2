//! Persists uploaded files under the media root.

use std::path::{Path, PathBuf};
use uuid::Uuid;

use raglet_core::error::Result;
use raglet_core::types::SavedFile;

/// Writes uploaded file parts to disk and reports their metadata.
pub struct FileSaver {
    media_root: PathBuf,
}

impl FileSaver {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Save one uploaded part. A missing filename gets a generated one;
    /// any path components in the client-supplied name are stripped.
    pub async fn save(
        &self,
        field: &str,
        filename: Option<&str>,
        content: &[u8],
    ) -> Result<SavedFile> {
        tokio::fs::create_dir_all(&self.media_root).await?;

        let filename = match filename {
            Some(name) if !name.is_empty() => sanitize(name),
            _ => format!("file-{}", Uuid::new_v4().simple()),
        };
        let dest = self.media_root.join(&filename);
        tokio::fs::write(&dest, content).await?;

        Ok(SavedFile {
            field: field.to_string(),
            filename,
            path: dest.to_string_lossy().into_owned(),
            size: content.len(),
        })
    }
}

/// Keep only the final path component of a client-supplied filename.
fn sanitize(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("file-{}", Uuid::new_v4().simple()))
}
