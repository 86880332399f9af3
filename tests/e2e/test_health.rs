use crate::helpers::TestContext;
use reqwest::StatusCode;

#[tokio::test]
async fn it_should_report_healthy() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get("/health").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_report_ready_with_database_connected() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get("/health/ready").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["status"], "ready");
    assert_eq!(response.json()["database"], "connected");
}

#[tokio::test]
async fn it_should_attach_a_request_id_to_responses() {
    let ctx = TestContext::new().await;

    let response = ctx.client.get("/health").await;
    assert!(response.header("x-request-id").is_some());
}
