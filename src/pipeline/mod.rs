pub mod import;
pub mod llm;
pub mod digest; // Batch → summarize → reduce
