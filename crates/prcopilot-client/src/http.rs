use std::time::Duration;

use async_trait::async_trait;
use prcopilot_core::review::Decision;
use prcopilot_core::summary::PrSummary;
use reqwest::{Client, StatusCode};

use crate::{ReviewService, ServiceError};

/// Async HTTP client implementation of ReviewService.
/// Talks to the external summarization backend:
/// `GET /pr-summaries`, `POST /pr/{pr_id}/approve`, `POST /pr/{pr_id}/reject`.
#[derive(Debug, Clone)]
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Like `new`, but every request is bounded by `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build http client");
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        handle_response(resp).await
    }

    /// POST with an empty body; the response body is ignored on success.
    async fn post_empty(&self, path: &str) -> Result<(), ServiceError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp).await)
        }
    }

    /// Issue the decision command for a PR.
    pub async fn submit_decision(&self, pr_id: i64, decision: Decision) -> Result<(), ServiceError> {
        self.post_empty(&format!("/pr/{pr_id}/{}", decision.as_str()))
            .await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Malformed(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error(resp: reqwest::Response) -> ServiceError {
    let status = resp.status();
    parse_error_with_status(status, resp).await
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    ServiceError::Backend {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ReviewService for HttpService {
    async fn list_summaries(&self) -> Result<Vec<PrSummary>, ServiceError> {
        self.get_json("/pr-summaries").await
    }

    async fn approve(&self, pr_id: i64) -> Result<(), ServiceError> {
        self.submit_decision(pr_id, Decision::Approve).await
    }

    async fn reject(&self, pr_id: i64) -> Result<(), ServiceError> {
        self.submit_decision(pr_id, Decision::Reject).await
    }
}
