use std::{net::SocketAddr, sync::Arc};

use headcount::{
    config::{AppConfig, ServerConfig},
    context::AppStatus,
    http_server::{self, ApiState},
    models::CommandEvent,
    persistence::HistoryStore,
};
use reqwest::Client;
use tokio::{sync::mpsc, task};
use tokio_util::sync::CancellationToken;

pub fn create_test_server_config(address: &str) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        bot_token: "test-token".to_string(),
        server: ServerConfig { listen_address: address.into(), ..Default::default() },
        ..Default::default()
    })
}

pub struct TestServer {
    pub address: SocketAddr,
    pub server_handle: task::JoinHandle<()>,
    pub client: Client,
    pub app_status: AppStatus,
    pub history: Arc<HistoryStore>,
    pub command_rx: mpsc::Receiver<CommandEvent>,
    cancellation_token: CancellationToken,
    _tmp: tempfile::TempDir,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_command_capacity(8).await
    }

    pub async fn with_command_capacity(capacity: usize) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get address");
        drop(listener); // Release port for the app to use

        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let config = create_test_server_config(&addr.to_string());
        let history = Arc::new(HistoryStore::load(tmp.path().join("database.json")).await);
        let app_status = AppStatus::default();
        let (command_tx, command_rx) = mpsc::channel(capacity);
        let cancellation_token = CancellationToken::new();

        let state = ApiState {
            config,
            app_status: app_status.clone(),
            history: history.clone(),
            command_tx,
        };

        // Spawn the actual app server
        let server_token = cancellation_token.clone();
        let server_handle = task::spawn(async move {
            http_server::run_server_from_config(state, server_token)
                .await
                .expect("Server failed");
        });

        // Wait for server to start
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        Self {
            address: addr,
            server_handle,
            client: Client::new(),
            app_status,
            history,
            command_rx,
            cancellation_token,
            _tmp: tmp,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        let url = format!("http://{}{}", self.address, path);
        self.client.get(&url).send().await.expect("Request failed")
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("http://{}{}", self.address, path);
        self.client.post(&url)
    }

    pub fn cleanup(self) {
        self.cancellation_token.cancel();
        self.server_handle.abort();
    }
}
