#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::HeaderMap;
use reqwest::StatusCode;
use serde_json::{json, Value};

use fleet_api::auth::{bearer_token, AuthError, AuthSubject, Authenticator};
use fleet_api::config::AppConfig;
use fleet_api::database::MemoryStore;
use fleet_api::{app, AppState};

/// Treats the bearer token itself as the subject
pub struct HeaderSubjectAuthenticator;

#[async_trait]
impl Authenticator for HeaderSubjectAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthSubject, AuthError> {
        let subject = bearer_token(headers)?.to_string();
        Ok(AuthSubject { subject, name: None })
    }
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Start a fresh app on an unused port with an empty in-memory store
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        config.server.public_base_url = base_url.clone();

        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(HeaderSubjectAuthenticator),
            config,
        )?;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self {
            port,
            base_url,
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

    pub async fn create_vessel(&self, subject: &str, name: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/vessels"))
            .bearer_auth(subject)
            .json(&json!({"name": name, "length": 28.5, "date_built": "1998-04-01"}))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create vessel: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn create_cargo(&self, item: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/cargo_items"))
            .json(&json!({"volume": 12, "item": item, "creation_date": "2020-01-01"}))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create cargo: {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn get_json(&self, path: &str, subject: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.get(self.url(path));
        if let Some(subject) = subject {
            req = req.bearer_auth(subject);
        }
        let res = req.send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }
}

pub fn id_of(body: &Value) -> u64 {
    body["id"].as_u64().expect("body has numeric id")
}
