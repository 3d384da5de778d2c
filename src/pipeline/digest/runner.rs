//! DigestRunner: orchestrates the full digest pipeline.
//!
//! Batcher → Summarizer (one batch at a time, in input order) → Reducer.
//! Abort-on-first-error: a failed or cancelled run returns no partial report.

use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use super::batcher::make_batches;
use super::control::CancelToken;
use super::error::DigestError;
use super::reducer::ThemeReducer;
use super::structure::inspect_structure;
use super::summarizer::ThemeSummarizer;
use super::types::*;
use crate::pipeline::llm::LlmClient;

/// Runs the digest pipeline with a fixed, validated configuration.
pub struct DigestRunner {
    config: DigestConfig,
}

impl DigestRunner {
    /// Validates the configuration up front, before any network activity.
    pub fn new(config: DigestConfig) -> Result<Self, DigestError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Summarize `items` into one report.
    ///
    /// `progress_fn` is called on every state transition. `cancel` is polled
    /// before each summarization call; a call already in flight completes.
    pub fn run(
        &self,
        items: &[String],
        llm: &dyn LlmClient,
        progress_fn: Option<&dyn Fn(PipelineState)>,
        cancel: Option<&CancelToken>,
    ) -> Result<DigestOutcome, DigestError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let _span = tracing::info_span!("digest", run_id = %run_id).entered();

        emit(
            progress_fn,
            PipelineState::Batching {
                item_count: items.len(),
            },
        );

        let batches = make_batches(items, self.config.batch_size)
            .map_err(|e| fail(progress_fn, e))?;

        if batches.is_empty() {
            tracing::info!("No feedback to summarize");
            emit(progress_fn, PipelineState::Empty);
            return Ok(DigestOutcome::NoFeedback);
        }

        let total = batches.len();
        tracing::info!(
            items = items.len(),
            batches = total,
            batch_size = self.config.batch_size,
            model = %self.config.model,
            "Digest starting"
        );

        let summarizer = ThemeSummarizer::new(&self.config);
        let mut summaries: Vec<BatchSummary> = Vec::with_capacity(total);

        for batch in &batches {
            check_cancelled(cancel, summaries.len(), progress_fn)?;
            emit(
                progress_fn,
                PipelineState::Summarizing {
                    current: batch.index,
                    total,
                },
            );

            let summary = summarizer
                .summarize(batch, llm)
                .map_err(|e| fail(progress_fn, e))?;
            summaries.push(summary);
        }

        let (text, reduced) = if total == 1 && !self.config.reduce_single_batch {
            tracing::debug!("Single batch, skipping merge pass");
            (summaries.remove(0).text, false)
        } else {
            check_cancelled(cancel, summaries.len(), progress_fn)?;
            emit(
                progress_fn,
                PipelineState::Reducing {
                    summary_count: summaries.len(),
                },
            );
            let text = ThemeReducer::new(&self.config)
                .reduce(&summaries, llm)
                .map_err(|e| fail(progress_fn, e))?;
            (text, true)
        };

        let structure = inspect_structure(&text);
        if !structure.within_contract() {
            tracing::warn!(
                themes = structure.theme_count,
                quotes = structure.quote_count,
                "Report does not look like 3-5 themes with 1-2 quotes each"
            );
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        emit(progress_fn, PipelineState::Done { duration_ms });
        tracing::info!(
            batches = total,
            reduced,
            report_chars = text.len(),
            duration_ms,
            "Digest completed"
        );

        Ok(DigestOutcome::Report(FinalReport {
            run_id,
            text,
            model: self.config.model.clone(),
            item_count: items.len(),
            batch_count: total,
            reduced,
            duration_ms,
            generated_at: Utc::now(),
        }))
    }
}

fn emit(progress_fn: Option<&dyn Fn(PipelineState)>, state: PipelineState) {
    if let Some(progress) = progress_fn {
        progress(state);
    }
}

/// Report the failure to the observer and hand the error back.
fn fail(progress_fn: Option<&dyn Fn(PipelineState)>, error: DigestError) -> DigestError {
    tracing::warn!(stage = ?error.stage(), error = %error, "Digest failed");
    emit(
        progress_fn,
        PipelineState::Failed {
            error: error.to_string(),
        },
    );
    error
}

fn check_cancelled(
    cancel: Option<&CancelToken>,
    completed_batches: usize,
    progress_fn: Option<&dyn Fn(PipelineState)>,
) -> Result<(), DigestError> {
    if cancel.is_some_and(CancelToken::is_cancelled) {
        tracing::info!(completed_batches, "Digest cancelled");
        emit(progress_fn, PipelineState::Cancelled { completed_batches });
        return Err(DigestError::Cancelled { completed_batches });
    }
    Ok(())
}
