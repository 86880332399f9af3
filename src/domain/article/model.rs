use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an article's audio generation.
///
/// `Completed` is the only status that carries a usable audio path; a record
/// may move back to `Processing` when a later identical submission finds the
/// audio file gone or the previous attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ArticleStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    /// Raw submitted text, exactly as fingerprinted.
    pub content: String,
    /// SHA-256 hex digest of `content`; the dedup key.
    pub content_hash: String,
    pub status: ArticleStatus,
    /// Path of the generated audio file; empty until `status` is completed.
    pub audio_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One narrated sentence of an article, used by clients for playback highlight.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sentence {
    pub id: i64,
    pub article_id: i64,
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub ord: i64,
}

/// Listing projection: everything but the article body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
}
