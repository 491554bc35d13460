//! Song enrichment: lyrics lookup, summarization and country extraction.

mod countries;
mod error;
mod outcome;
mod pipeline;
mod retry_policy;
mod summarize;
mod text_generation;

pub use countries::CountryExtractionService;
pub use error::UpstreamError;
pub use outcome::Outcome;
pub use pipeline::{EnrichmentPipeline, LYRICS_NOT_FOUND_SUMMARY, PROCESSING_ERROR_SUMMARY};
pub use retry_policy::RetryPolicy;
pub use summarize::{SummarizationService, NO_LYRICS_SUMMARY, SUMMARY_ERROR};
pub use text_generation::TextGeneration;
