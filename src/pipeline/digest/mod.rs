//! Feedback digest pipeline.
//!
//! Turns an arbitrarily long list of feedback texts into one themed report
//! despite the per-request size limit of the summarization endpoint.
//!
//! ```text
//! items → Batcher → Batch Summarizer (per batch) → Reducer → FinalReport
//! ```
//!
//! Batches are summarized one at a time in input order. The reducer only runs
//! once every batch summary exists; a failure anywhere aborts the run and
//! discards partial summaries.

pub mod error;
pub mod types;
pub mod batcher;
pub mod prompt;
pub mod summarizer;
pub mod reducer;
pub mod structure;
pub mod control;
pub mod runner;

pub use error::DigestError;
pub use types::*;
pub use batcher::{batch_count, make_batches};
pub use summarizer::ThemeSummarizer;
pub use reducer::ThemeReducer;
pub use structure::{inspect_structure, StructureReport};
pub use control::{CancelToken, SharedStatus};
pub use runner::DigestRunner;
