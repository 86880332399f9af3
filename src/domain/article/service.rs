use super::error::GenerationError;
use super::fingerprint::fingerprint;
use super::model::{Article, ArticleStatus};
use crate::infrastructure::repositories::ArticleRepository;
use crate::infrastructure::synthesis::SynthesisClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Generation orchestrator: resolves submitted content against the article
/// store and drives the remote synthesis workflow for cache misses.
///
/// `resolve` never blocks on the provider — the synthesis phase runs on a
/// detached task and reconciles its outcome into the store when it finishes.
#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<ArticleRepository>,
    synthesizer: Arc<dyn SynthesisClient>,
    audio_dir: PathBuf,
}

impl ArticleService {
    pub fn new(
        repo: Arc<ArticleRepository>,
        synthesizer: Arc<dyn SynthesisClient>,
        audio_dir: PathBuf,
    ) -> Self {
        Self {
            repo,
            synthesizer,
            audio_dir,
        }
    }

    /// Resolve (title, content) to an article record, launching audio
    /// generation when no usable cached audio exists.
    ///
    /// - Completed record whose audio file is still on disk: cache hit, no
    ///   remote call.
    /// - Record currently processing: conflict, surfaced synchronously.
    /// - Anything else (new content, failed attempt, completed record with a
    ///   missing file): a fresh generation attempt is spawned and the current
    ///   record state is returned immediately.
    pub async fn resolve(&self, title: &str, content: &str) -> Result<Article, GenerationError> {
        let hash = fingerprint(content);

        if let Some(article) = self.repo.find_by_fingerprint(&hash).await? {
            match article.status {
                ArticleStatus::Completed if !article.audio_path.is_empty() => {
                    if tokio::fs::try_exists(&article.audio_path).await.unwrap_or(false) {
                        tracing::info!(
                            article_id = article.id,
                            title = %article.title,
                            "cache hit, serving stored audio"
                        );
                        return Ok(article);
                    }
                    tracing::warn!(
                        article_id = article.id,
                        audio_path = %article.audio_path,
                        "record exists but audio file is missing, regenerating"
                    );
                }
                ArticleStatus::Processing => return Err(GenerationError::InProgress),
                _ => {}
            }
            self.spawn_generation(article.clone());
            return Ok(article);
        }

        let article = self.repo.insert_or_fetch(title, content, &hash).await?;
        self.spawn_generation(article.clone());
        Ok(article)
    }

    /// Detach the synthesis workflow from the request path. The provider's
    /// polling loop can take tens of seconds; HTTP callers observe the
    /// `pending`/`processing` record in the meantime.
    fn spawn_generation(&self, article: Article) {
        let service = self.clone();
        tokio::spawn(async move {
            service.run_generation(article).await;
        });
    }

    async fn run_generation(&self, article: Article) {
        // Status-conditioned claim: concurrent attempts for the same
        // fingerprint collapse to a single writer.
        match self.repo.claim_processing(article.id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(
                    article_id = article.id,
                    "another generation attempt holds this article, skipping"
                );
                return;
            }
            Err(e) => {
                tracing::error!(article_id = article.id, error = %e, "failed to claim article");
                return;
            }
        }

        tracing::info!(
            article_id = article.id,
            title = %article.title,
            content_length = article.content.len(),
            "starting audio generation"
        );

        match self.generate(&article).await {
            Ok(path) => {
                if let Err(e) = self
                    .repo
                    .update_status(article.id, ArticleStatus::Completed, &path)
                    .await
                {
                    tracing::error!(article_id = article.id, error = %e, "failed to record completion");
                    return;
                }
                tracing::info!(article_id = article.id, audio_path = %path, "audio generation completed");
            }
            Err(e) => {
                tracing::error!(article_id = article.id, error = %e, "audio generation failed");
                if let Err(e) = self
                    .repo
                    .update_status(article.id, ArticleStatus::Failed, "")
                    .await
                {
                    tracing::error!(article_id = article.id, error = %e, "failed to record failure");
                }
            }
        }
    }

    async fn generate(&self, article: &Article) -> Result<String, GenerationError> {
        let audio = self.synthesizer.synthesize(&article.content).await?;

        // Deterministic name derived from record identity plus a fingerprint
        // prefix, so re-generations of the same article land on the same path.
        let filename = format!("audio_{}_{}.mp3", article.id, &article.content_hash[..8]);
        let path = self.audio_dir.join(filename);

        tokio::fs::create_dir_all(&self.audio_dir).await?;
        tokio::fs::write(&path, &audio).await?;

        Ok(path.to_string_lossy().into_owned())
    }
}
