use crate::domain::article::{ArticleService, ArticleStatus, GenerationError};
use crate::infrastructure::repositories::ArticleRepository;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Manifest {
    articles: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    title: String,
    /// Markdown source, relative to the data directory
    markdown: String,
    /// Pre-generated audio file, relative to the data directory
    audio: String,
}

/// Import a legacy article library described by `<data_dir>/manifest.json`.
///
/// Each entry's markdown is pushed through the normal resolve path, so new
/// content gets narrated like any submission. When the manifest ships a
/// pre-generated audio file and the record has none yet, the file is copied
/// into the managed audio directory and the record marked completed, sparing
/// a remote round-trip. Missing manifest means nothing to do; individual
/// entry failures are logged and skipped.
pub async fn seed_from_manifest(
    service: &ArticleService,
    repo: &ArticleRepository,
    data_dir: &Path,
) {
    let manifest_path = data_dir.join("manifest.json");
    let raw = match tokio::fs::read(&manifest_path).await {
        Ok(raw) => raw,
        Err(_) => {
            tracing::info!(path = %manifest_path.display(), "no legacy manifest, skipping seed");
            return;
        }
    };

    let manifest: Manifest = match serde_json::from_slice(&raw) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse legacy manifest");
            return;
        }
    };

    for entry in manifest.articles {
        let markdown_path = data_dir.join(&entry.markdown);
        let content = match tokio::fs::read_to_string(&markdown_path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(path = %markdown_path.display(), error = %e, "failed to read seed markdown");
                continue;
            }
        };

        tracing::info!(title = %entry.title, "seeding legacy article");

        let article = match service.resolve(&entry.title, &content).await {
            Ok(article) => article,
            Err(GenerationError::InProgress) => {
                tracing::info!(title = %entry.title, "seed article already generating");
                continue;
            }
            Err(e) => {
                tracing::error!(title = %entry.title, error = %e, "failed to seed article");
                continue;
            }
        };

        if article.status == ArticleStatus::Completed {
            continue;
        }

        // Link pre-generated audio when the manifest ships it
        let legacy_audio = data_dir.join(&entry.audio);
        if tokio::fs::try_exists(&legacy_audio).await.unwrap_or(false) {
            let audio_dir = data_dir.join("audio");
            let target = audio_dir.join(format!("legacy_{}", entry.audio));

            let copy = async {
                tokio::fs::create_dir_all(&audio_dir).await?;
                tokio::fs::copy(&legacy_audio, &target).await
            };
            if let Err(e) = copy.await {
                tracing::error!(title = %entry.title, error = %e, "failed to link legacy audio");
                continue;
            }

            let target = target.to_string_lossy().into_owned();
            if let Err(e) = repo
                .update_status(article.id, ArticleStatus::Completed, &target)
                .await
            {
                tracing::error!(title = %entry.title, error = %e, "failed to record legacy audio");
                continue;
            }
            tracing::info!(title = %entry.title, audio_path = %target, "linked legacy audio");
        }
    }
}
