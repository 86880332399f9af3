use crate::helpers::TestContext;
use reqwest::StatusCode;
use serde_json::json;

const HELLO_WORLD_HASH: &str = "64ec88ca00b268e5ba1a35678a1b5316d212f4f366b2477232534a8aeca37f3c";

#[tokio::test]
async fn it_should_create_a_pending_article_for_new_content() {
    let mut ctx = TestContext::new().await;
    ctx.mock_successful_synthesis(b"audio").await;

    let response = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Greeting", "content": "Hello world"}),
        )
        .await;

    response.assert_status(StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["content_hash"], HELLO_WORLD_HASH);
    assert_eq!(body["title"], "Greeting");
    assert_eq!(body["audio_path"], "");
}

#[tokio::test]
async fn it_should_complete_generation_and_serve_the_audio_file() {
    let mut ctx = TestContext::new().await;
    ctx.mock_successful_synthesis(b"narrated bytes").await;

    let response = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Greeting", "content": "Hello world"}),
        )
        .await;
    response.assert_status(StatusCode::OK);
    let article_id = response.json()["id"].as_i64().unwrap();

    let article = ctx.wait_for_terminal(article_id).await;
    assert_eq!(article["status"], "completed");

    // The stored path follows the deterministic naming scheme
    let audio_path = article["audio_path"].as_str().unwrap();
    let filename = format!("audio_{}_64ec88ca.mp3", article_id);
    assert!(audio_path.ends_with(&filename));

    // And the artifact is served through the static audio route
    let audio = ctx.client.get(&format!("/audio/{}", filename)).await;
    audio.assert_status(StatusCode::OK);
    assert_eq!(audio.body_bytes, b"narrated bytes");
}

#[tokio::test]
async fn it_should_not_resynthesize_completed_content() {
    let mut ctx = TestContext::new().await;
    ctx.mock_successful_synthesis(b"audio").await;

    let first = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Greeting", "content": "Hello world"}),
        )
        .await;
    let article_id = first.json()["id"].as_i64().unwrap();
    ctx.wait_for_terminal(article_id).await;

    // Identical content again, different title: same record, no new workflow
    let second = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Another title", "content": "Hello world"}),
        )
        .await;

    second.assert_status(StatusCode::OK);
    let body = second.json();
    assert_eq!(body["id"].as_i64().unwrap(), article_id);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["content_hash"], HELLO_WORLD_HASH);

    // The submit endpoint saw exactly one workflow
    ctx.assert_single_workflow().await;
}

#[tokio::test]
async fn it_should_mark_the_article_failed_when_the_provider_rejects() {
    let mut ctx = TestContext::new().await;
    ctx.mock_provider_rejection(1002).await;

    let response = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Greeting", "content": "Hello world"}),
        )
        .await;
    // The request itself succeeds; the failure lands on the record
    response.assert_status(StatusCode::OK);
    let article_id = response.json()["id"].as_i64().unwrap();

    let article = ctx.wait_for_terminal(article_id).await;
    assert_eq!(article["status"], "failed");
    assert_eq!(article["audio_path"], "");
}

#[tokio::test]
async fn it_should_retry_failed_content_on_resubmission() {
    let mut ctx = TestContext::new().await;
    ctx.mock_provider_rejection(1002).await;

    let first = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Greeting", "content": "Hello world"}),
        )
        .await;
    let article_id = first.json()["id"].as_i64().unwrap();
    let article = ctx.wait_for_terminal(article_id).await;
    assert_eq!(article["status"], "failed");

    // Provider recovers; the same submission now goes through
    ctx.mock_successful_synthesis(b"second attempt").await;

    let second = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Greeting", "content": "Hello world"}),
        )
        .await;
    second.assert_status(StatusCode::OK);
    assert_eq!(second.json()["id"].as_i64().unwrap(), article_id);

    let article = ctx.wait_for_terminal(article_id).await;
    assert_eq!(article["status"], "completed");
}

#[tokio::test]
async fn it_should_reject_an_empty_title() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "  ", "content": "Hello world"}),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Title cannot be empty");
}

#[tokio::test]
async fn it_should_reject_empty_content() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .post("/api/v1/articles", &json!({"title": "Greeting", "content": ""}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Content cannot be empty");
}

#[tokio::test]
async fn it_should_return_not_found_for_an_unknown_article() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get("/api/v1/articles/9999").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_should_list_article_summaries_without_bodies() {
    let mut ctx = TestContext::new().await;
    ctx.mock_successful_synthesis(b"audio").await;

    ctx.client
        .post(
            "/api/v1/articles",
            &json!({"title": "First", "content": "Content of the first article"}),
        )
        .await
        .assert_status(StatusCode::OK);

    let response = ctx.client.get("/api/v1/articles").await;
    response.assert_status(StatusCode::OK);

    let list = response.json().as_array().expect("list should be an array").clone();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "First");
    assert!(list[0].get("content").is_none());
    assert!(list[0].get("status").is_some());
}

#[tokio::test]
async fn it_should_include_sentences_in_article_detail() {
    let mut ctx = TestContext::new().await;
    ctx.mock_successful_synthesis(b"audio").await;

    let response = ctx
        .client
        .post(
            "/api/v1/articles",
            &json!({"title": "Greeting", "content": "Hello world"}),
        )
        .await;
    let article_id = response.json()["id"].as_i64().unwrap();

    let detail = ctx
        .client
        .get(&format!("/api/v1/articles/{}", article_id))
        .await;
    detail.assert_status(StatusCode::OK);
    // No narration alignment has been recorded yet, but the field is present
    assert!(detail.json()["sentences"].as_array().is_some());
}
