//! Prompt templates for the batch and merge passes.

use super::types::{Batch, BatchSummary};

pub const SYSTEM_PERSONA: &str = "You are a helpful and concise product strategist.";

pub const BATCH_INSTRUCTION: &str = "You are a product strategist. Analyze the following user feedback. \
Group them into 3–5 key themes. For each theme, give a short summary and include 1–2 user quotes, \
taken verbatim or near-verbatim from the feedback below.";

pub const REDUCE_INSTRUCTION: &str = "You are a product strategist. The summaries below were each \
produced from a separate batch of the same user feedback set. Merge them into one consolidated \
list of 3–5 key themes. Combine themes that overlap across batches. For each theme, give a short \
summary and include 1–2 user quotes taken from the batch summaries.";

/// Label preceding each batch summary in the merge payload.
pub fn batch_label(index: usize) -> String {
    format!("Batch {index}")
}

/// One `- item` bullet per feedback item. Line breaks inside an item are
/// folded so every item stays a single bullet.
fn bullet(item: &str) -> String {
    let folded: Vec<&str> = item.split_whitespace().collect();
    format!("- {}", folded.join(" "))
}

/// Build the user instruction for one batch.
pub fn build_batch_prompt(batch: &Batch<'_>) -> String {
    let bullets: Vec<String> = batch.items.iter().map(|item| bullet(item)).collect();
    format!("{BATCH_INSTRUCTION}\n\nUser feedback:\n{}", bullets.join("\n"))
}

/// Build the user instruction for the merge pass. Summaries appear in the
/// order given, which the caller keeps equal to batch order.
pub fn build_reduce_prompt(summaries: &[BatchSummary]) -> String {
    let sections: Vec<String> = summaries
        .iter()
        .map(|s| format!("### {}\n{}", batch_label(s.index), s.text.trim()))
        .collect();
    format!(
        "{REDUCE_INSTRUCTION}\n\nBatch summaries:\n\n{}",
        sections.join("\n\n")
    )
}
