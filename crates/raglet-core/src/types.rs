//! Records exchanged between the Raglet crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A demo item row from the relational store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A question/answer record written after each `/api/ask` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub question: String,
    pub answer: String,
    pub tokens: Option<i32>,
    pub sources: Vec<String>,
}

/// A stored query-history row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub tokens: Option<i32>,
    pub sources: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The result of a chat completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub answer: String,
    pub total_tokens: Option<u32>,
}

/// A point to upsert into the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    /// UUID string; Qdrant accepts UUIDs as point ids.
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

/// A similarity-search hit with its payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    pub payload: serde_json::Value,
}

impl ScoredPoint {
    /// Payload text used as answer context (`text`, falling back to `content`).
    pub fn context_text(&self) -> String {
        self.payload["text"]
            .as_str()
            .or_else(|| self.payload["content"].as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Human-readable source label (`filename`, then `source`, then the id).
    pub fn source_label(&self) -> String {
        self.payload["filename"]
            .as_str()
            .or_else(|| self.payload["source"].as_str())
            .map(String::from)
            .unwrap_or_else(|| self.id.clone())
    }
}

/// Metadata for an uploaded file persisted to the media root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFile {
    pub field: String,
    pub filename: String,
    pub path: String,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scored_point_prefers_text_and_filename() {
        let hit = ScoredPoint {
            id: "abc".into(),
            score: 0.9,
            payload: json!({"text": "ctx", "filename": "a.txt"}),
        };
        assert_eq!(hit.context_text(), "ctx");
        assert_eq!(hit.source_label(), "a.txt");
    }

    #[test]
    fn scored_point_falls_back_to_id() {
        let hit = ScoredPoint {
            id: "point-1".into(),
            score: 0.1,
            payload: json!({}),
        };
        assert_eq!(hit.context_text(), "");
        assert_eq!(hit.source_label(), "point-1");
    }
}
