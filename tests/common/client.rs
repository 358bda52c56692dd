//! HTTP client for end-to-end tests
//!
//! When routes change, update only this file.

use super::constants::*;
use reqwest::{Response, StatusCode};
use std::time::Duration;

pub struct TestClient {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn get_root(&self) -> Response {
        self.get("/").await
    }

    pub async fn get_index(&self) -> Response {
        self.get("/index").await
    }

    /// Fetches a page and returns its status and body.
    pub async fn get_page(&self, path: &str) -> (StatusCode, String) {
        let response = self.get(path).await;
        let status = response.status();
        let body = response.text().await.expect("Failed to read body");
        (status, body)
    }
}
