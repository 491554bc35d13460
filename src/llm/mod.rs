//! LLM provider abstraction layer.
//!
//! The enrichment services talk to a text-generation backend through the
//! [`LlmProvider`] trait; [`OpenAIProvider`] is the production implementation.

mod openai;
mod provider;
mod types;

pub use openai::{OpenAIProvider, OPENAI_API_BASE};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
