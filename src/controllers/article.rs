use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::article::{Article, ArticleService, ArticleSummary, Sentence},
    error::{AppError, AppResult},
    infrastructure::repositories::ArticleRepository,
};

/// Request for POST /api/v1/articles
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
}

/// Article detail payload: the record plus its ordered sentence sub-records
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub sentences: Vec<Sentence>,
}

pub struct ArticleController {
    service: Arc<ArticleService>,
    repo: Arc<ArticleRepository>,
}

impl ArticleController {
    pub fn new(service: Arc<ArticleService>, repo: Arc<ArticleRepository>) -> Self {
        Self { service, repo }
    }

    /// GET /api/v1/articles - List the article library
    pub async fn list_articles(
        State(controller): State<Arc<ArticleController>>,
    ) -> AppResult<Json<Vec<ArticleSummary>>> {
        let summaries = controller.repo.list_summaries().await?;
        Ok(Json(summaries))
    }

    /// GET /api/v1/articles/:id - Article detail with sentence sub-records
    pub async fn get_article(
        State(controller): State<Arc<ArticleController>>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<ArticleDetail>> {
        let article = controller
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))?;
        let sentences = controller.repo.sentences_for(id).await?;

        Ok(Json(ArticleDetail { article, sentences }))
    }

    /// POST /api/v1/articles - Submit content for narration
    ///
    /// Returns the article record immediately; audio generation runs detached
    /// and is observable through the record's status.
    pub async fn create_article(
        State(controller): State<Arc<ArticleController>>,
        Json(request): Json<CreateArticleRequest>,
    ) -> AppResult<Json<Article>> {
        if request.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title cannot be empty".to_string()));
        }
        if request.content.trim().is_empty() {
            return Err(AppError::BadRequest("Content cannot be empty".to_string()));
        }

        let article = controller
            .service
            .resolve(&request.title, &request.content)
            .await
            .map_err(AppError::from)?;

        Ok(Json(article))
    }
}
