//! Batch summarizer: one summarization call per batch.

use std::time::Instant;

use super::error::DigestError;
use super::prompt::{build_batch_prompt, SYSTEM_PERSONA};
use super::types::{Batch, BatchSummary, DigestConfig, DigestStage};
use crate::pipeline::llm::{complete_sanitized, CompletionRequest, LlmClient};

/// Summarizes a single batch into 3–5 themes with quotes.
pub struct ThemeSummarizer<'a> {
    config: &'a DigestConfig,
}

impl<'a> ThemeSummarizer<'a> {
    pub fn new(config: &'a DigestConfig) -> Self {
        Self { config }
    }

    /// Request sent for `batch`.
    pub fn build_request(&self, batch: &Batch<'_>) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            system: SYSTEM_PERSONA.to_string(),
            prompt: build_batch_prompt(batch),
            temperature: self.config.temperature,
            max_tokens: self.config.max_output_tokens,
        }
    }

    pub fn summarize(
        &self,
        batch: &Batch<'_>,
        llm: &dyn LlmClient,
    ) -> Result<BatchSummary, DigestError> {
        let start = Instant::now();
        let request = self.build_request(batch);

        let text = complete_sanitized(llm, &request).map_err(|source| {
            DigestError::Summarization {
                stage: DigestStage::Batch(batch.index),
                source,
            }
        })?;

        tracing::debug!(
            batch = batch.index,
            items = batch.len(),
            response_chars = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch summarized"
        );

        Ok(BatchSummary {
            index: batch.index,
            item_count: batch.len(),
            text,
        })
    }
}
