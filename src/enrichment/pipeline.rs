use super::{
    CountryExtractionService, Outcome, RetryPolicy, SummarizationService, TextGeneration,
};
use crate::config::AppConfig;
use crate::llm::{CompletionOptions, LlmProvider, OpenAIProvider};
use crate::lyrics::{LyricsProvider, MusixmatchClient};
use crate::song::SongRecord;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const LYRICS_NOT_FOUND_SUMMARY: &str = "Lyrics not found";
pub const PROCESSING_ERROR_SUMMARY: &str = "Error processing song";

/// Fills in lyrics, summary and countries of a [`SongRecord`].
pub struct EnrichmentPipeline {
    lyrics_provider: Arc<dyn LyricsProvider>,
    summarizer: SummarizationService,
    country_extractor: CountryExtractionService,
}

impl EnrichmentPipeline {
    pub fn new(
        lyrics_provider: Arc<dyn LyricsProvider>,
        summarizer: SummarizationService,
        country_extractor: CountryExtractionService,
    ) -> Self {
        Self {
            lyrics_provider,
            summarizer,
            country_extractor,
        }
    }

    /// Production wiring: Musixmatch lyrics and an OpenAI-compatible chat model,
    /// all three calls sharing the configured retry policy.
    pub fn from_config(config: &AppConfig) -> Self {
        let retry_policy = RetryPolicy::new(&config.retry);

        let lyrics_provider = MusixmatchClient::new(
            config.lyrics.base_url.clone(),
            config.musixmatch_api_key.clone(),
            Duration::from_secs(config.lyrics.timeout_sec),
            retry_policy.clone(),
        );

        let llm = OpenAIProvider::new(
            config.llm.base_url.clone(),
            config.llm.model.clone(),
            Some(config.openai_api_key.clone()),
        );
        info!(
            "Text generation via {} model {}",
            llm.name(),
            llm.model()
        );
        let options = CompletionOptions {
            temperature: config.llm.temperature,
            max_tokens: None,
            timeout: Duration::from_secs(config.llm.timeout_sec),
        };
        let text_generation = TextGeneration::new(Arc::new(llm), options, retry_policy);

        Self::new(
            Arc::new(lyrics_provider),
            SummarizationService::new(text_generation.clone()),
            CountryExtractionService::new(text_generation),
        )
    }

    /// Enriches `song`. Never fails: every problem ends up as a placeholder in
    /// the returned record.
    ///
    /// - usable lyrics already present: no lookup, summary and countries are
    ///   computed unless both are already set;
    /// - lyrics found: stored, then summarized and scanned for countries;
    /// - lyrics not found, or the lookup failed after retries: summary
    ///   `"Lyrics not found"`, countries empty;
    /// - anything unexpected: summary `"Error processing song"`, countries
    ///   empty.
    pub async fn enrich(&self, song: SongRecord) -> SongRecord {
        let fallback = song.clone();
        match AssertUnwindSafe(self.enrich_inner(song)).catch_unwind().await {
            Ok(enriched) => enriched,
            Err(panic) => {
                error!(
                    "Unexpected failure while processing {}: {}",
                    fallback,
                    panic_message(panic.as_ref())
                );
                with_placeholders(fallback, PROCESSING_ERROR_SUMMARY)
            }
        }
    }

    async fn enrich_inner(&self, mut song: SongRecord) -> SongRecord {
        if let Some(lyrics) = song.usable_lyrics() {
            if song.is_enriched() {
                debug!("{} is already enriched, skipping", song);
                return song;
            }
            let lyrics = lyrics.to_string();
            song.summary = Some(self.summarizer.summary(&lyrics).await);
            song.countries = Some(self.country_extractor.countries(&lyrics).await);
            return song;
        }

        match self
            .lyrics_provider
            .fetch(&song.artist_name, &song.song_title)
            .await
        {
            Outcome::Found(lyrics) => {
                info!("Found lyrics for {}", song);
                song.summary = Some(self.summarizer.summary(&lyrics).await);
                song.countries = Some(self.country_extractor.countries(&lyrics).await);
                song.lyrics = Some(lyrics);
                song
            }
            Outcome::NotFound => {
                info!("No lyrics found for {}", song);
                with_placeholders(song, LYRICS_NOT_FOUND_SUMMARY)
            }
            Outcome::Failed(reason) => {
                warn!("Lyrics lookup for {} failed: {}", song, reason);
                with_placeholders(song, LYRICS_NOT_FOUND_SUMMARY)
            }
        }
    }
}

fn with_placeholders(mut song: SongRecord, summary: &str) -> SongRecord {
    if song.usable_lyrics().is_none() {
        song.lyrics = None;
    }
    song.summary = Some(summary.to_string());
    song.countries = Some(String::new());
    song
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
