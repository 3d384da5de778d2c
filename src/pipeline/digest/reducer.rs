//! Reducer: merges ordered batch summaries into the final report text.

use std::time::Instant;

use super::error::DigestError;
use super::prompt::{build_reduce_prompt, SYSTEM_PERSONA};
use super::types::{BatchSummary, DigestConfig, DigestStage};
use crate::pipeline::llm::{complete_sanitized, CompletionRequest, LlmClient};

pub struct ThemeReducer<'a> {
    config: &'a DigestConfig,
}

impl<'a> ThemeReducer<'a> {
    pub fn new(config: &'a DigestConfig) -> Self {
        Self { config }
    }

    pub fn build_request(&self, summaries: &[BatchSummary]) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            system: SYSTEM_PERSONA.to_string(),
            prompt: build_reduce_prompt(summaries),
            temperature: self.config.temperature,
            max_tokens: self.config.max_output_tokens,
        }
    }

    /// Merge `summaries` (already in batch order) with one more call.
    pub fn reduce(
        &self,
        summaries: &[BatchSummary],
        llm: &dyn LlmClient,
    ) -> Result<String, DigestError> {
        if summaries.is_empty() {
            return Err(DigestError::NothingToReduce);
        }

        let start = Instant::now();
        let request = self.build_request(summaries);

        let text = complete_sanitized(llm, &request).map_err(|source| {
            DigestError::Summarization {
                stage: DigestStage::Reduction,
                source,
            }
        })?;

        tracing::debug!(
            summaries = summaries.len(),
            prompt_chars = request.prompt.len(),
            response_chars = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch summaries merged"
        );

        Ok(text)
    }
}
