use mockito::Matcher;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use voicepaper_backend::controllers::ArticleController;
use voicepaper_backend::domain::article::ArticleService;
use voicepaper_backend::infrastructure::db::{create_pool, migrate};
use voicepaper_backend::infrastructure::http::build_router;
use voicepaper_backend::infrastructure::repositories::ArticleRepository;
use voicepaper_backend::infrastructure::synthesis::MiniMaxClient;


pub use api_client::TestClient;

/// One application instance wired against a mocked speech provider,
/// listening on an ephemeral port with its own database and data directory.
pub struct TestContext {
    pub client: TestClient,
    pub provider: mockito::ServerGuard,
    #[allow(dead_code)]
    pub audio_dir: PathBuf,
    /// Mocks live here so they stay registered for the whole test
    mocks: Vec<mockito::Mock>,
    submit_mock: Option<mockito::Mock>,
    _data_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let provider = mockito::Server::new_async().await;

        let data_dir = tempfile::tempdir().expect("Failed to create data dir");
        let db_path = data_dir.path().join("voicepaper.db");
        let pool = create_pool(&format!("sqlite://{}", db_path.display()))
            .await
            .expect("Failed to create pool");
        migrate(&pool).await.expect("Failed to migrate");

        let pool = Arc::new(pool);
        let audio_dir = data_dir.path().join("audio");

        // Same wiring as main.rs, with the provider pointed at the mock server
        // and a fast polling loop so tests stay quick
        let article_repo = Arc::new(ArticleRepository::new(pool.clone()));
        let synthesis_client = Arc::new(MiniMaxClient::new(
            provider.url(),
            "test-api-key".to_string(),
            Duration::from_millis(5),
            10,
        ));
        let article_service = Arc::new(ArticleService::new(
            article_repo.clone(),
            synthesis_client,
            audio_dir.clone(),
        ));
        let article_controller = Arc::new(ArticleController::new(
            article_service,
            article_repo.clone(),
        ));

        let app = build_router(pool, audio_dir.clone(), article_controller);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = TestClient::new(&format!("http://{}", addr));

        Self {
            client,
            provider,
            audio_dir,
            mocks: Vec::new(),
            submit_mock: None,
            _data_dir: data_dir,
        }
    }

    /// Stub the provider's full happy path: submit -> poll Success ->
    /// retrieve -> download of a tar container holding `audio` as its mp3
    /// entry.
    pub async fn mock_successful_synthesis(&mut self, audio: &[u8]) {
        let submit = self
            .provider
            .mock("POST", "/v1/t2a_async_v2")
            .with_body(
                json!({"base_resp": {"status_code": 0, "status_msg": "success"}, "task_id": 7})
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        self.submit_mock = Some(submit);

        let query = self
            .provider
            .mock("GET", "/v1/query/t2a_async_query_v2")
            .match_query(Matcher::Any)
            .with_body(
                json!({
                    "base_resp": {"status_code": 0, "status_msg": "success"},
                    "status": "Success",
                    "file_id": 42
                })
                .to_string(),
            )
            .create_async()
            .await;
        self.mocks.push(query);

        let download_url = format!("{}/download/42.tar", self.provider.url());
        let retrieve = self
            .provider
            .mock("GET", "/v1/files/retrieve")
            .match_query(Matcher::Any)
            .with_body(
                json!({
                    "base_resp": {"status_code": 0, "status_msg": "success"},
                    "file": {"download_url": download_url}
                })
                .to_string(),
            )
            .create_async()
            .await;
        self.mocks.push(retrieve);

        let download = self
            .provider
            .mock("GET", "/download/42.tar")
            .with_body(tar_with_mp3(audio))
            .create_async()
            .await;
        self.mocks.push(download);
    }

    /// Stub the provider rejecting the submit call outright
    pub async fn mock_provider_rejection(&mut self, code: i32) {
        let submit = self
            .provider
            .mock("POST", "/v1/t2a_async_v2")
            .with_body(
                json!({"base_resp": {"status_code": code, "status_msg": "rejected"}}).to_string(),
            )
            .create_async()
            .await;
        self.mocks.push(submit);
    }

    /// Assert that exactly one synthesis workflow reached the provider
    pub async fn assert_single_workflow(&self) {
        self.submit_mock
            .as_ref()
            .expect("no successful synthesis mock installed")
            .assert_async()
            .await;
    }

    /// Poll the article detail endpoint until generation reaches a terminal
    /// status, returning the final payload.
    pub async fn wait_for_terminal(&self, article_id: i64) -> serde_json::Value {
        for _ in 0..500 {
            let response = self
                .client
                .get(&format!("/api/v1/articles/{}", article_id))
                .await;
            let body = response.body.expect("article detail should be JSON");
            let status = body["status"].as_str().unwrap_or_default().to_string();
            if status == "completed" || status == "failed" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("article {} never reached a terminal status", article_id);
    }
}

/// Build a tar container with a single mp3 entry, the shape the provider's
/// download URL serves
pub fn tar_with_mp3(audio: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(audio.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "output/speech.mp3", audio)
        .unwrap();
    builder.into_inner().unwrap()
}
