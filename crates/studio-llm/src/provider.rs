use async_trait::async_trait;
use thiserror::Error;

use crate::types::{GenerativeRequest, GenerativeResponse};

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Response blocked by safety filters: {0}")]
    Blocked(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Protocol conversion error: {0}")]
    Protocol(#[from] crate::protocol::ProtocolError),
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// The generative-AI boundary: prompt plus optional media in, JSON, text or bytes out.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate(&self, request: GenerativeRequest) -> Result<GenerativeResponse>;

    /// Check whether `api_key` is accepted by the service.
    async fn validate_key(&self, api_key: &str) -> Result<bool> {
        Ok(!api_key.trim().is_empty())
    }
}
