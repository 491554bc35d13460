//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for the server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
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

    /// GET /
    pub async fn home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    /// POST /add/ with artist and title only
    pub async fn add_song(&self, artist_name: &str, song_title: &str) -> Response {
        self.add_song_json(json!({
            "artist_name": artist_name,
            "song_title": song_title,
        }))
        .await
    }

    /// POST /add/ with an arbitrary JSON body
    pub async fn add_song_json(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/add/", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Add song request failed")
    }

    /// POST /add/ with a raw body, for malformed payloads
    pub async fn add_song_raw(&self, body: &'static str) -> Response {
        self.client
            .post(format!("{}/add/", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Add song request failed")
    }
}
