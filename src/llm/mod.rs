//! Language model gateway
//!
//! One operation: a prompt goes in, completion text comes out. Model
//! identity and sampling parameters are bound at construction and never
//! vary per call; retries, if wanted, belong to a wrapper, not here.

pub mod openai;

use crate::error::LlmResult;

pub use openai::OpenAiModel;

/// A synchronous-from-the-caller's-perspective text completion
pub trait CompletionModel: Send + Sync {
    /// Send one prompt, get the completion text back.
    ///
    /// # Errors
    /// Returns `LlmError` on transport failure, non-success API status,
    /// missing completion content, or timeout.
    fn complete(&self, prompt: &str) -> impl Future<Output = LlmResult<String>> + Send;
}

impl<T: CompletionModel> CompletionModel for &T {
    fn complete(&self, prompt: &str) -> impl Future<Output = LlmResult<String>> + Send {
        T::complete(*self, prompt)
    }
}
