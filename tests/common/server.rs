//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own database.

use super::constants::*;
use super::fixtures::{seed_test_data, FakeEchoNest};
use songlister_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use songlister_server::songlist::{Enricher, Song, SonglistManager, SqliteSonglistStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Manager over the same database, for direct access in tests
    pub manager: Arc<SonglistManager>,

    /// Seeded songs in insertion order, empty for [`TestServer::spawn_empty`]
    pub songs: Vec<Song>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server over a seeded database on a random port
    pub async fn spawn() -> Self {
        Self::start(true, None).await
    }

    /// Spawns a server over an empty database, the index user does not exist
    pub async fn spawn_empty() -> Self {
        Self::start(false, None).await
    }

    /// Spawns a seeded server that also serves `static_dir` under /static
    pub async fn spawn_with_static_dir(static_dir: &std::path::Path) -> Self {
        Self::start(true, Some(static_dir.to_string_lossy().to_string())).await
    }

    async fn start(seed: bool, static_dir_path: Option<String>) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteSonglistStore::new(temp_db_dir.path().join("songlister.db"))
            .expect("Failed to open songlist store");
        let manager = Arc::new(SonglistManager::new(
            Arc::new(store),
            Enricher::new(Arc::new(FakeEchoNest), Duration::from_secs(5)),
        ));

        let songs = if seed {
            seed_test_data(&manager)
                .await
                .expect("Failed to seed test data")
        } else {
            vec![]
        };

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

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            index_user_id: INDEX_USER_ID,
            static_dir_path,
        };
        let app = make_app(config, manager.clone(), "test".to_string());

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
            manager,
            songs,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Polls the index until the server answers, whatever the status
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
                Ok(_) => return,
                Err(_) => {
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
    }
}
