use crate::domain::article::{Article, ArticleStatus, ArticleSummary, Sentence};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use std::sync::Arc;

pub struct ArticleRepository {
    pool: Arc<DbPool>,
}

impl ArticleRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Look up the canonical record for a content fingerprint
    pub async fn find_by_fingerprint(&self, hash: &str) -> AppResult<Option<Article>> {
        let pool = self.pool.as_ref();
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, content_hash, status, audio_path, created_at, updated_at
            FROM articles
            WHERE content_hash = ?
            "#,
        )
        .bind(hash)
        .fetch_optional(pool)
        .await?;

        Ok(article)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Article>> {
        let pool = self.pool.as_ref();
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, content_hash, status, audio_path, created_at, updated_at
            FROM articles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(article)
    }

    /// Sentence sub-records for an article, in narration order
    pub async fn sentences_for(&self, article_id: i64) -> AppResult<Vec<Sentence>> {
        let pool = self.pool.as_ref();
        let sentences = sqlx::query_as::<_, Sentence>(
            r#"
            SELECT id, article_id, text, start_ms, end_ms, ord
            FROM sentences
            WHERE article_id = ?
            ORDER BY ord ASC
            "#,
        )
        .bind(article_id)
        .fetch_all(pool)
        .await?;

        Ok(sentences)
    }

    /// Create a pending record for new content, or return the existing record
    /// when another submission already holds this fingerprint. The unique
    /// index on content_hash makes this race-free: concurrent first-time
    /// submissions converge on a single row.
    pub async fn insert_or_fetch(
        &self,
        title: &str,
        content: &str,
        hash: &str,
    ) -> AppResult<Article> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO articles (title, content, content_hash, status, audio_path, created_at, updated_at)
            VALUES (?, ?, ?, 'pending', '', ?, ?)
            ON CONFLICT(content_hash) DO NOTHING
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(hash)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, content_hash, status, audio_path, created_at, updated_at
            FROM articles
            WHERE content_hash = ?
            "#,
        )
        .bind(hash)
        .fetch_one(pool)
        .await?;

        Ok(article)
    }

    /// Move a record into `processing`, clearing any stale audio path.
    /// Returns false when another attempt already holds the record, so
    /// concurrent generation tasks collapse to a single writer.
    pub async fn claim_processing(&self, id: i64) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET status = 'processing', audio_path = '', updated_at = ?
            WHERE id = ? AND status != 'processing'
            "#,
        )
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: ArticleStatus,
        audio_path: &str,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            UPDATE articles
            SET status = ?, audio_path = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(audio_path)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Listing projection for the library view
    pub async fn list_summaries(&self) -> AppResult<Vec<ArticleSummary>> {
        let pool = self.pool.as_ref();
        let summaries = sqlx::query_as::<_, ArticleSummary>(
            r#"
            SELECT id, title, status, created_at
            FROM articles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(summaries)
    }
}
