use super::{Outcome, TextGeneration};
use tracing::error;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that identifies all countries \
    mentioned in song lyrics. You should return list of countries with commas, \
    without any additional text. If there were no countries mentioned, return \
    empty string. Not cities, not villages, only countries.";

/// Extraction of the countries mentioned in song lyrics.
#[derive(Clone)]
pub struct CountryExtractionService {
    text_generation: TextGeneration,
}

impl CountryExtractionService {
    pub fn new(text_generation: TextGeneration) -> Self {
        Self { text_generation }
    }

    /// Comma-separated countries mentioned in `lyrics`.
    ///
    /// `Found("")` means no country is mentioned; `Failed` means the model
    /// could not be asked.
    pub async fn extract(&self, lyrics: &str) -> Outcome<String> {
        if lyrics.trim().is_empty() {
            return Outcome::Found(String::new());
        }

        let prompt = format!(
            "List all countries mentioned in the following lyrics: {}. ONLY COUNTRIES should be mentioned.",
            lyrics
        );
        let outcome: Outcome<String> = self
            .text_generation
            .ask("extract_countries", SYSTEM_PROMPT, prompt)
            .await
            .into();
        if let Outcome::Failed(reason) = &outcome {
            error!("Error extracting countries: {}", reason);
        }
        outcome.map(|answer| normalize_countries(&answer))
    }

    /// Like [`Self::extract`], with failures collapsed to an empty list.
    pub async fn countries(&self, lyrics: &str) -> String {
        self.extract(lyrics).await.or_placeholder("", "")
    }
}

/// Canonical "A, B, C" form of a model answer.
fn normalize_countries(answer: &str) -> String {
    answer
        .split([',', '\n'])
        .map(|entry| entry.trim().trim_matches(|c| c == '"' || c == '.').trim())
        .filter(|entry| !entry.is_empty() && !entry.eq_ignore_ascii_case("none"))
        .collect::<Vec<_>>()
        .join(", ")
}
