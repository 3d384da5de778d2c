//! Digest pipeline error types.

use thiserror::Error;

use super::types::DigestStage;
use crate::pipeline::llm::LlmError;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Summarization failed at {stage}: {source}")]
    Summarization {
        stage: DigestStage,
        #[source]
        source: LlmError,
    },

    #[error("Reduction requested with no batch summaries")]
    NothingToReduce,

    #[error("Digest cancelled after {completed_batches} batch(es)")]
    Cancelled { completed_batches: usize },
}

impl DigestError {
    /// Stage that triggered a summarization failure, if any.
    pub fn stage(&self) -> Option<DigestStage> {
        match self {
            Self::Summarization { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Batch index (1-based) for failures raised while summarizing a batch.
    pub fn batch_index(&self) -> Option<usize> {
        match self.stage() {
            Some(DigestStage::Batch(index)) => Some(index),
            _ => None,
        }
    }
}
