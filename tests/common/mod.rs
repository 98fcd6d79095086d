#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use redoot::config::AppConfig;
use redoot::database::MemoryStore;
use redoot::routes;
use redoot::state::AppState;

pub const PASSWORD: &str = "correct horse";

/// In-process server backed by a fresh in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: Arc<AppState>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::development()).await
    }

    pub async fn spawn_with(mut config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.api.enable_request_logging = false;

        let state = Arc::new(AppState::new(Arc::new(MemoryStore::new()), &config)?);
        let app = routes::app(state.clone(), &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
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

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(&body).send().await?)
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.put(self.url(path)).json(&body).send().await?)
    }

    pub async fn delete(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).json(&body).send().await?)
    }

    /// Registers `name` with [`PASSWORD`] and returns the new id
    pub async fn register(&self, name: &str) -> Result<Uuid> {
        let res = self
            .post(
                "/users",
                json!({ "user": { "name": name, "password": PASSWORD, "email": format!("{}@example.com", name) } }),
            )
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED, "registering {}", name);
        let id = data(res).await?["id"].as_str().context("missing id")?.parse()?;
        Ok(id)
    }

    /// Registers `name` and grants it administrator rights directly through the registry
    pub async fn register_admin(&self, name: &str) -> Result<Uuid> {
        let id = self.register(name).await?;
        self.state.admins.grant(id).await?;
        Ok(id)
    }

    /// Creates a board owned by `owner` and returns its id
    pub async fn create_board(&self, owner: &str, name: &str, moderators: &[Uuid]) -> Result<Uuid> {
        let res = self
            .post(
                "/boards",
                json!({ "board": { "name": name, "moderators": moderators }, "requester": requester(owner) }),
            )
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        Ok(data(res).await?["id"].as_str().context("missing id")?.parse()?)
    }

    /// Creates a post on `board` authored by `author` and returns its id
    pub async fn create_post(&self, author: &str, board: Uuid, title: &str) -> Result<Uuid> {
        let res = self
            .post(
                &format!("/boards/{}/posts", board),
                json!({ "post": { "title": title, "bodyType": "text", "bodyContent": "hello" }, "requester": requester(author) }),
            )
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        Ok(data(res).await?["id"].as_str().context("missing id")?.parse()?)
    }
}

pub fn requester(name: &str) -> Value {
    json!({ "name": name, "password": PASSWORD })
}

/// Unwraps the success envelope
pub async fn data(res: Response) -> Result<Value> {
    let body: Value = res.json().await?;
    anyhow::ensure!(body["success"] == json!(true), "unexpected error body: {}", body);
    Ok(body["data"].clone())
}

/// Returns the `error` code of an error envelope
pub async fn error_code(res: Response) -> Result<String> {
    let body: Value = res.json().await?;
    anyhow::ensure!(body["success"] == json!(false), "expected an error body: {}", body);
    Ok(body["error"].as_str().unwrap_or_default().to_string())
}
