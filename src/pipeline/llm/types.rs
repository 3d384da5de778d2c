use serde::{Deserialize, Serialize};

use super::LlmError;

/// One text-generation call: a fixed persona plus a user instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    /// System-level persona.
    pub system: String,
    /// User-level instruction, including the payload being summarized.
    pub prompt: String,
    pub temperature: f32,
    /// Upper bound on generated output, in tokens.
    pub max_tokens: u32,
}

/// Summarization capability abstraction (allows mocking).
///
/// Calls are blocking. Implementations are expected to bound each call with
/// a timeout and report it as [`LlmError::Timeout`].
pub trait LlmClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

impl<T: LlmClient + ?Sized> LlmClient for &T {
    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        (**self).complete(request)
    }
}
