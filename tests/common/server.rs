//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database directory and its
//! own upstream stubs.

use super::constants::*;
use super::stubs::{spawn_musixmatch_stub, spawn_openai_stub, StubService};
use lyrics_enrichment_server::config::{
    AppConfig, CliConfig, FileConfig, LlmConfig, LyricsConfig, RetryConfig,
};
use lyrics_enrichment_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use lyrics_enrichment_server::{EnrichmentPipeline, SongStore, SqliteSongStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated database and upstream stubs
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Song store for direct database access in tests
    pub song_store: Arc<dyn SongStore>,

    /// Lyrics API stub
    pub musixmatch: StubService,

    /// Chat completions API stub
    pub openai: StubService,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// The configuration goes through the same resolution as the binary, with
    /// upstream URLs pointing at the stubs and retries that do not wait.
    ///
    /// # Panics
    ///
    /// Panics if any resource cannot be created or the server does not become
    /// ready within the timeout.
    pub async fn spawn() -> Self {
        let musixmatch = spawn_musixmatch_stub().await;
        let openai = spawn_openai_stub().await;

        let temp_db_dir = TempDir::new().expect("Failed to create temp db dir");

        let cli = CliConfig {
            db_dir: Some(temp_db_dir.path().to_path_buf()),
            port: 0,
            logging_level: RequestsLoggingLevel::None,
            musixmatch_api_key: Some(TEST_MUSIXMATCH_KEY.to_string()),
            openai_api_key: Some(TEST_OPENAI_KEY.to_string()),
        };
        let file_config = FileConfig {
            lyrics: Some(LyricsConfig {
                base_url: Some(musixmatch.base_url.clone()),
                timeout_sec: Some(5),
            }),
            llm: Some(LlmConfig {
                base_url: Some(openai.base_url.clone()),
                ..Default::default()
            }),
            retry: Some(RetryConfig {
                max_attempts: Some(3),
                initial_backoff_secs: Some(0),
                max_backoff_secs: Some(0),
                backoff_multiplier: Some(1.0),
            }),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, Some(file_config)).expect("Invalid test config");

        let song_store: Arc<dyn SongStore> = Arc::new(
            SqliteSongStore::new(config.song_db_path()).expect("Failed to open song store"),
        );
        let pipeline = Arc::new(EnrichmentPipeline::from_config(&config));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let server_config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
        };
        let app = make_app(server_config, song_store.clone(), pipeline).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            song_store,
            musixmatch,
            openai,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir is cleaned up automatically
    }
}
