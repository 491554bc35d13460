//! Musixmatch API client for fetching song lyrics.

use super::LyricsProvider;
use crate::enrichment::{Outcome, RetryPolicy, UpstreamError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const MUSIXMATCH_API_BASE: &str = "https://api.musixmatch.com/ws/1.1";

/// Status code Musixmatch puts in `message.header.status_code` on success.
const MUSIXMATCH_SUCCESS: u64 = 200;

pub struct MusixmatchClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl MusixmatchClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
            retry_policy,
        }
    }

    /// A single lookup, without retries.
    async fn fetch_once(&self, artist: &str, title: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/matcher.lyrics.get", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q_artist", artist),
                ("q_track", title),
            ])
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        // The body is inspected as loose JSON: on errors Musixmatch sends
        // `"body": []` instead of an object.
        let data: Value = response.json().await?;

        let status_code = data
            .pointer("/message/header/status_code")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                UpstreamError::InvalidResponse("missing message.header.status_code".to_string())
            })?;

        if status_code != MUSIXMATCH_SUCCESS {
            error!(
                status_code,
                artist = %artist,
                title = %title,
                "Musixmatch API returned an error"
            );
            return Err(UpstreamError::NotFound(format!(
                "Musixmatch status code {}",
                status_code
            )));
        }

        data.pointer("/message/body/lyrics/lyrics_body")
            .and_then(Value::as_str)
            .filter(|lyrics| !lyrics.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::NotFound("no lyrics_body in response".to_string()))
    }
}

#[async_trait]
impl LyricsProvider for MusixmatchClient {
    async fn fetch(&self, artist: &str, title: &str) -> Outcome<String> {
        debug!(artist = %artist, title = %title, "Fetching lyrics");
        self.retry_policy
            .run("fetch_lyrics", || self.fetch_once(artist, title))
            .await
            .into()
    }
}
