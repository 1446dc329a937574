//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `facade-server`
//! integration tests:
//!
//! - `TestApp`: a full application harness that spawns a real server on a
//!   random port, backed by a temporary SQLite file and an AI provider
//!   pointed at an `httpmock::MockServer` standing in for the model API.
//!
//! Each test passes a unique name which is used as a path prefix on the mock
//! server, keeping mocks isolated when `httpmock` pools server instances.

// Allow unused code because this is a test utility module, and not all
// functions are used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use facade_server::{config, router, state::AppState};
use httpmock::MockServer;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::{fs::File, io::Write, net::SocketAddr, path::PathBuf};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub db_path: PathBuf,
    pub app_state: AppState,
    /// Path on the mock server the configured provider posts to.
    pub chat_path: String,
    _db_file: Option<NamedTempFile>,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server with a temporary database file.
    pub async fn spawn(test_name: &str) -> Result<Self> {
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_path_buf();
        let mut app = TestApp::spawn_with_db_url(test_name, db_path.to_str().unwrap()).await?;
        app._db_file = Some(db_file);
        Ok(app)
    }

    /// Spawns the application server with an in-memory database (no file on
    /// disk, so the export endpoint has nothing to serve).
    pub async fn spawn_in_memory(test_name: &str) -> Result<Self> {
        TestApp::spawn_with_db_url(test_name, ":memory:").await
    }

    async fn spawn_with_db_url(test_name: &str, db_url: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let chat_path = format!("/{test_name}/v1/chat/completions");

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
providers:
  default:
    provider: "local"
    api_url: "{}"
    api_key: null
    model_name: "mock-vision-model"
"#,
            db_url,
            mock_server.url(&chat_path),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = facade_server::state::build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            db_path: PathBuf::from(db_url),
            app_state: app_state_for_harness,
            chat_path,
            _db_file: None,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Posts a batch of images to `POST /images` as multipart form data.
    pub async fn upload_images(&self, files: Vec<(&str, Vec<u8>)>) -> Result<reqwest::Response> {
        let mut form = Form::new();
        for (file_name, bytes) in files {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str("image/jpeg")?;
            form = form.part("file", part);
        }

        let response = self
            .client
            .post(format!("{}/images", self.address))
            .multipart(form)
            .send()
            .await?;
        Ok(response)
    }

    /// Opens an independent connection to the test database for assertions.
    pub async fn db_connection(&self) -> Result<turso::Connection> {
        let db = turso::Builder::new_local(self.db_path.to_str().unwrap())
            .build()
            .await?;
        Ok(db.connect()?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// The canned provider response body for a successful extraction.
pub fn chat_completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{
            "message": { "role": "assistant", "content": content }
        }]
    })
}

/// Base64 form of image bytes as they appear inside the provider request
/// body, for request matching.
pub fn image_b64(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
