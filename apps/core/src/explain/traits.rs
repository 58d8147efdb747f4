use crate::error::AppError;
use async_trait::async_trait;

/// Parameters of a single chat-style completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Defines the public interface for a text-generation backend.
///
/// This trait abstracts the remote service producing prevention guidance, so a
/// hosted chat-completions endpoint and an in-process mock can be used
/// interchangeably.
#[async_trait]
pub trait ExplanationBackend: Send + Sync + 'static {
    /// Sends one system instruction plus one user prompt and returns the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError>;
}
