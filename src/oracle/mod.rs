//! Text-completion backends.

use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;

/// Errors from talking to a text model.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("No text returned: {0}")]
    Blocked(String),
}

/// Prompt in, free-form text out. No structure is promised about the text.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}
