use super::{RetryPolicy, UpstreamError};
use crate::llm::{CompletionOptions, LlmProvider, Message};
use std::sync::Arc;

/// A text-generation backend together with the options and retry policy every
/// prompt is sent with.
#[derive(Clone)]
pub struct TextGeneration {
    llm: Arc<dyn LlmProvider>,
    options: CompletionOptions,
    retry_policy: RetryPolicy,
}

impl TextGeneration {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        options: CompletionOptions,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            llm,
            options,
            retry_policy,
        }
    }

    /// Sends a system + user prompt pair and returns the trimmed answer.
    pub async fn ask(
        &self,
        operation: &str,
        system_prompt: &str,
        user_prompt: String,
    ) -> Result<String, UpstreamError> {
        let messages = [Message::system(system_prompt), Message::user(user_prompt)];
        let response = self
            .retry_policy
            .run(operation, || self.llm.complete(&messages, &self.options))
            .await?;
        Ok(response.message.content.trim().to_string())
    }
}
