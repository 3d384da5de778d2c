//! Test double for the summarization capability.

use std::cell::RefCell;

use super::types::{CompletionRequest, LlmClient};
use super::LlmError;

/// Records every request and answers with a canned response.
///
/// Responses are numbered `"<response> #<call number>"` so tests can tell
/// which call produced which summary. `with_response` turns numbering off.
pub struct RecordingLlm {
    response: String,
    numbered: bool,
    fail_on_call: Option<usize>,
    calls: RefCell<Vec<CompletionRequest>>,
}

impl Default for RecordingLlm {
    fn default() -> Self {
        Self {
            response: "summary".to_string(),
            numbered: true,
            fail_on_call: None,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl RecordingLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer with exactly `response`.
    pub fn with_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            numbered: false,
            ..Self::new()
        }
    }

    /// Fail the n-th call (1-based) with a rate-limit error.
    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl LlmClient for RecordingLlm {
    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let call_number = {
            let mut calls = self.calls.borrow_mut();
            calls.push(request.clone());
            calls.len()
        };

        if self.fail_on_call == Some(call_number) {
            return Err(LlmError::RateLimited("quota exceeded".into()));
        }

        if self.numbered {
            Ok(format!("{} #{call_number}", self.response))
        } else {
            Ok(self.response.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4".into(),
            system: "system".into(),
            prompt: "prompt".into(),
            temperature: 0.5,
            max_tokens: 10,
        }
    }

    #[test]
    fn default_numbers_responses() {
        let llm = RecordingLlm::default();
        assert_eq!(llm.complete(&request()).unwrap(), "summary #1");
        assert_eq!(llm.complete(&request()).unwrap(), "summary #2");
        assert_eq!(llm.call_count(), 2);
    }

    #[test]
    fn with_response_is_unnumbered() {
        let llm = RecordingLlm::with_response("fixed");
        assert_eq!(llm.complete(&request()).unwrap(), "fixed");
        assert_eq!(llm.complete(&request()).unwrap(), "fixed");
    }

    #[test]
    fn failing_on_records_the_failed_call() {
        let llm = RecordingLlm::new().failing_on(2);
        assert!(llm.complete(&request()).is_ok());
        assert!(matches!(
            llm.complete(&request()),
            Err(LlmError::RateLimited(_))
        ));
        assert_eq!(llm.call_count(), 2);
    }
}
