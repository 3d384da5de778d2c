//! Core types for the feedback digest pipeline.
//!
//! Lifecycle: feedback items → Batch → BatchSummary → FinalReport.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DigestError;

// ═══════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════

/// Tunables recognized by the pipeline. Injected at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Maximum feedback items per summarization call.
    pub batch_size: usize,
    /// Sampling temperature for every call.
    pub temperature: f32,
    /// Maximum generated tokens per call.
    pub max_output_tokens: u32,
    /// Model identifier sent to the endpoint.
    pub model: String,
    /// Run the merge pass even when there is a single batch.
    /// When false, the lone batch summary becomes the report.
    pub reduce_single_batch: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            temperature: 0.5,
            max_output_tokens: 1000,
            model: "gpt-4".to_string(),
            reduce_single_batch: true,
        }
    }
}

impl DigestConfig {
    /// Reject unusable tunables before any network activity.
    pub fn validate(&self) -> Result<(), DigestError> {
        if self.batch_size < 1 {
            return Err(DigestError::InvalidConfiguration(
                "batch_size must be at least 1".into(),
            ));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(DigestError::InvalidConfiguration(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.max_output_tokens < 1 {
            return Err(DigestError::InvalidConfiguration(
                "max_output_tokens must be at least 1".into(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(DigestError::InvalidConfiguration(
                "model must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════
// Batches and summaries
// ═══════════════════════════════════════════

/// A contiguous, non-empty slice of the input feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
    /// 1-based position in the run.
    pub index: usize,
    pub items: &'a [String],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Themes and quotes produced from exactly one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// 1-based index of the batch this summary covers.
    pub index: usize,
    pub item_count: usize,
    pub text: String,
}

/// Terminal output of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub run_id: String,
    pub text: String,
    pub model: String,
    pub item_count: usize,
    pub batch_count: usize,
    /// False when the merge pass was skipped for a single batch.
    pub reduced: bool,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
}

impl FinalReport {
    /// Render as a standalone markdown document.
    pub fn to_markdown(&self) -> String {
        format!(
            "# Feedback Insights\n\n_{} feedback item(s) in {} batch(es) · {} · {}_\n\n{}\n",
            self.item_count,
            self.batch_count,
            self.model,
            self.generated_at.format("%Y-%m-%d %H:%M UTC"),
            self.text.trim_end(),
        )
    }
}

/// Result of a run that did not fail.
#[derive(Debug, Clone)]
pub enum DigestOutcome {
    /// Zero usable feedback items. No summarization calls were made.
    NoFeedback,
    Report(FinalReport),
}

impl DigestOutcome {
    pub fn report(&self) -> Option<&FinalReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoFeedback => None,
        }
    }

    /// Text shown to the user: the report or an explanation.
    pub fn message(&self) -> &str {
        match self {
            Self::Report(report) => &report.text,
            Self::NoFeedback => "No feedback to summarize: every selected value was empty.",
        }
    }
}

// ═══════════════════════════════════════════
// Stages and progress
// ═══════════════════════════════════════════

/// Where a summarization failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestStage {
    /// Summarizing the batch with this 1-based index.
    Batch(usize),
    Reduction,
}

impl fmt::Display for DigestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch(index) => write!(f, "batch {index}"),
            Self::Reduction => write!(f, "reduction stage"),
        }
    }
}

/// Pipeline state, emitted to the progress observer on every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Batching {
        item_count: usize,
    },
    /// Working on batch `current` of `total` (1-based).
    Summarizing {
        current: usize,
        total: usize,
    },
    Reducing {
        summary_count: usize,
    },
    Done {
        duration_ms: u64,
    },
    /// Terminal: nothing to summarize.
    Empty,
    Failed {
        error: String,
    },
    Cancelled {
        completed_batches: usize,
    },
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done { .. } | Self::Empty | Self::Failed { .. } | Self::Cancelled { .. }
        )
    }
}
