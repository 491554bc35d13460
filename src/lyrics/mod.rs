//! Lyrics lookup.
//!
//! [`LyricsProvider`] is the seam the enrichment pipeline depends on;
//! [`MusixmatchClient`] implements it against the Musixmatch matcher API.

mod musixmatch;

pub use musixmatch::{MusixmatchClient, MUSIXMATCH_API_BASE};

use crate::enrichment::Outcome;
use async_trait::async_trait;

#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Looks up the lyrics of `title` by `artist`.
    ///
    /// Never fails hard: transport problems end up as [`Outcome::Failed`] once
    /// retries are exhausted.
    async fn fetch(&self, artist: &str, title: &str) -> Outcome<String>;
}
