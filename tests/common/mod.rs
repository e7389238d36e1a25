#![allow(dead_code)]

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::Router;
use reqwest::StatusCode;
use serde_json::{json, Value};

use storefront_api::config::AppConfig;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

/// Development settings with the embedded contract and quiet request logging.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.api.enable_request_logging = false;
    config.contract.path = None;
    config
}

/// A fresh router with empty stores, for `tower::ServiceExt::oneshot` tests.
pub fn test_app(config: &AppConfig) -> Router {
    storefront_api::server::build(config).expect("embedded contract should load")
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Port 0 picks an unused port; bind before spawning so the address is known
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").context("failed to bind test listener")?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let app = test_app(&test_config());

        // Each #[tokio::test] owns a runtime that dies with the test, so the
        // shared server gets a runtime of its own on a background thread
        std::thread::Builder::new()
            .name("storefront-test-server".to_string())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .expect("failed to build test runtime");
                runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::from_std(listener)
                        .expect("failed to adopt test listener");
                    axum::serve(listener, app).await.expect("test server failed");
                });
            })
            .context("failed to spawn server thread")?;

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/v1/hello", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Creates a user through the API and returns the 201 body.
pub async fn create_user(server: &TestServer, name: &str, age: u32, email: &str) -> Result<Value> {
    let res = reqwest::Client::new()
        .post(server.url("/v1/users"))
        .json(&json!({ "name": name, "age": age, "email": email }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "expected 201 creating user, got {}",
        res.status()
    );
    Ok(res.json().await?)
}

/// Creates a product through the API and returns the 201 body.
pub async fn create_product(server: &TestServer, fields: Value) -> Result<Value> {
    let res = reqwest::Client::new()
        .post(server.url("/v1/products"))
        .json(&fields)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "expected 201 creating product, got {}",
        res.status()
    );
    Ok(res.json().await?)
}
