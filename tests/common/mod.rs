#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{redirect, Client, Response, StatusCode};

use todo_list::config::{AppConfig, Secret};
use todo_list::database::Database;
use todo_list::server::{self, AppState};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// A server running the real router in-process on its own port and its own
/// in-memory database.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub db: Database,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.url = "sqlite::memory:".to_string();
    config.session.secret = Some(Secret::new(TEST_SECRET));
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string();
    config.security.enable_request_logging = false;
    // Keep hashing cheap so tests stay fast
    config.security.password_memory_kib = 1024;
    config.security.password_iterations = 1;
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let db = Database::in_memory().await?;
    let state = AppState::new(db.clone(), test_config());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        axum::serve(listener, server::app(state)).await.ok();
    });

    let server = TestServer { port, base_url, db };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// Client that keeps cookies like a browser and does not follow redirects
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("failed to build client")
}

pub async fn api_register(server: &TestServer, client: &Client, username: &str, password: &str) -> Result<Response> {
    Ok(client
        .post(server.url("/api/register"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await?)
}

pub async fn api_login(server: &TestServer, client: &Client, username: &str, password: &str) -> Result<Response> {
    Ok(client
        .post(server.url("/api/login"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await?)
}

/// A fresh client already logged in as a newly registered user
pub async fn logged_in_client(server: &TestServer, username: &str) -> Result<Client> {
    let client = client();
    let res = api_register(server, &client, username, "pw1").await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register {} failed: {}", username, res.status());
    Ok(client)
}

pub async fn json(res: Response) -> Result<serde_json::Value> {
    Ok(res.json::<serde_json::Value>().await?)
}
