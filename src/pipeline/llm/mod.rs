pub mod types;
pub mod openai;
pub mod sanitize;
#[cfg(test)]
pub mod mock;

pub use types::*;
pub use openai::*;
pub use sanitize::*;

use thiserror::Error;

/// Failures of the summarization capability.
///
/// Every variant is recoverable from the pipeline's point of view: the
/// orchestrator tags it with the stage that triggered it and stops the run.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Summarization endpoint is not reachable at {0}")]
    Connection(String),

    #[error("Summarization endpoint returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Summarization endpoint rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("Rate limited by summarization endpoint: {0}")]
    RateLimited(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid timeout: timeout_secs must be at least 1")]
    InvalidTimeout,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("No API key configured (set OPENAI_API_KEY or pass --api-key)")]
    MissingApiKey,
}
