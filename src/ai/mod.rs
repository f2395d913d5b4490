//! Tea sommelier response generation
//!
//! The chat session talks to a [`ResponseGenerator`]; the production
//! implementation is [`GeminiClient`]. Tests substitute their own.

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;

use crate::chat::ChatMessage;

/// Errors produced while asking the generator for a reply.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API credential was supplied.
    #[error("missing API key")]
    MissingApiKey,

    /// The HTTP request could not be completed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The API returned a non-success status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The response body was not the expected shape.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The response parsed but carried no usable text.
    #[error("no response text")]
    EmptyResponse,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Produces an assistant reply for `message` given the prior transcript.
#[async_trait::async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`AiError`] on transport failure or when the reply has no text.
    async fn generate(&self, history: &[ChatMessage], message: &str) -> Result<String, AiError>;
}
