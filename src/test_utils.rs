//! Test doubles shared by the unit tests.
//!
//! In-memory implementations of [`LlmProvider`] and [`LyricsProvider`] that
//! count their calls, plus factories wiring them into the enrichment services.

use crate::enrichment::{
    CountryExtractionService, EnrichmentPipeline, Outcome, RetryPolicy, SummarizationService,
    TextGeneration,
};
use crate::llm::{
    CompletionOptions, CompletionResponse, FinishReason, LlmError, LlmProvider, Message,
    MessageRole,
};
use crate::lyrics::LyricsProvider;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Chat model answering summary prompts and country prompts with fixed text,
/// or failing every call.
pub struct FakeLlm {
    summary: Option<String>,
    countries: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(summary: &str, countries: &str) -> Arc<Self> {
        Arc::new(Self {
            summary: Some(summary.to_string()),
            countries: Some(countries.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            summary: None,
            countries: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let asks_for_countries = messages
            .iter()
            .any(|m| m.role == MessageRole::System && m.content.contains("countries"));
        if let Some(user) = messages.iter().find(|m| m.role == MessageRole::User) {
            self.prompts.lock().unwrap().push(user.content.clone());
        }

        let reply = if asks_for_countries {
            self.countries.clone()
        } else {
            self.summary.clone()
        };
        match reply {
            Some(content) => Ok(CompletionResponse {
                message: Message::assistant(content),
                finish_reason: FinishReason::Stop,
                usage: None,
            }),
            None => Err(LlmError::Connection("connection refused".to_string())),
        }
    }
}

/// Lyrics source with a canned answer.
pub struct FakeLyrics {
    outcome: Option<Outcome<String>>,
    calls: AtomicUsize,
}

impl FakeLyrics {
    pub fn returning(outcome: Outcome<String>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Some(outcome),
            calls: AtomicUsize::new(0),
        })
    }

    /// Panics on every lookup.
    pub fn panicking() -> Arc<Self> {
        Arc::new(Self {
            outcome: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LyricsProvider for FakeLyrics {
    async fn fetch(&self, _artist: &str, _title: &str) -> Outcome<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Some(outcome) => outcome.clone(),
            None => panic!("lyrics backend exploded"),
        }
    }
}

/// Text generation over `llm` with three immediate attempts.
pub fn text_generation(llm: Arc<FakeLlm>) -> TextGeneration {
    TextGeneration::new(llm, CompletionOptions::default(), RetryPolicy::immediate(3))
}

pub fn pipeline_with(lyrics: Arc<FakeLyrics>, llm: Arc<FakeLlm>) -> EnrichmentPipeline {
    let text_generation = text_generation(llm);
    EnrichmentPipeline::new(
        lyrics,
        SummarizationService::new(text_generation.clone()),
        CountryExtractionService::new(text_generation),
    )
}
