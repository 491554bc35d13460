use super::{Outcome, TextGeneration};
use tracing::error;

pub const NO_LYRICS_SUMMARY: &str = "No lyrics provided.";
pub const SUMMARY_ERROR: &str = "Error summarizing lyrics.";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes song lyrics.";

/// One-sentence summaries of song lyrics.
#[derive(Clone)]
pub struct SummarizationService {
    text_generation: TextGeneration,
}

impl SummarizationService {
    pub fn new(text_generation: TextGeneration) -> Self {
        Self { text_generation }
    }

    /// Summarizes `lyrics`. Empty lyrics short-circuit without any outbound call.
    pub async fn summarize(&self, lyrics: &str) -> Outcome<String> {
        if lyrics.trim().is_empty() {
            return Outcome::Found(NO_LYRICS_SUMMARY.to_string());
        }

        let prompt = format!("Summarize these song lyrics in one sentence:\n\n{}", lyrics);
        let outcome: Outcome<String> = self
            .text_generation
            .ask("summarize_lyrics", SYSTEM_PROMPT, prompt)
            .await
            .into();
        if let Outcome::Failed(reason) = &outcome {
            error!("Error summarizing lyrics: {}", reason);
        }
        outcome
    }

    /// Like [`Self::summarize`], with failures replaced by a placeholder.
    pub async fn summary(&self, lyrics: &str) -> String {
        self.summarize(lyrics)
            .await
            .or_placeholder(SUMMARY_ERROR, SUMMARY_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{text_generation, FakeLlm};

    #[tokio::test]
    async fn test_summarize_lyrics_no_lyrics() {
        let llm = FakeLlm::replying("unused", "unused");
        let service = SummarizationService::new(text_generation(llm.clone()));

        assert_eq!(service.summary("").await, "No lyrics provided.");
        assert_eq!(service.summary("   ").await, "No lyrics provided.");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_summary_is_trimmed() {
        let llm = FakeLlm::replying("  A song about saying hello.\n", "");
        let service = SummarizationService::new(text_generation(llm.clone()));

        let summary = service.summarize("Hello, it's me").await;

        assert_eq!(
            summary,
            Outcome::Found("A song about saying hello.".to_string())
        );
        assert_eq!(llm.calls(), 1);
        let prompts = llm.prompts();
        assert!(prompts[0].starts_with("Summarize these song lyrics in one sentence:"));
        assert!(prompts[0].ends_with("Hello, it's me"));
    }

    #[tokio::test]
    async fn test_failure_becomes_placeholder_after_retries() {
        let llm = FakeLlm::failing();
        let service = SummarizationService::new(text_generation(llm.clone()));

        assert_eq!(service.summary("some lyrics").await, "Error summarizing lyrics.");
        assert_eq!(llm.calls(), 3);
    }
}
