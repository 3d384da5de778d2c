use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use feedback_digest::config::{self, Settings};
use feedback_digest::pipeline::digest::{DigestOutcome, DigestRunner, PipelineState};
use feedback_digest::pipeline::import::{load_feedback, preview_rows, read_columns};
use feedback_digest::pipeline::llm::OpenAiClient;

#[derive(Parser)]
#[command(name = "feedback-digest", version, about = "Group user feedback into key themes with an LLM")]
struct App {
    /// Settings file (defaults to <config dir>/feedback-digest/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the columns of a CSV file
    Columns {
        csv: PathBuf,
    },
    /// Show the first rows of a CSV file
    Preview {
        csv: PathBuf,
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Summarize one column of a CSV file into key themes
    Summarize {
        csv: PathBuf,
        /// Column holding the feedback text (auto-detects "feedback"/"comments")
        #[arg(long)]
        column: Option<String>,
        /// Write the markdown report here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        max_tokens: Option<u32>,
        #[arg(long)]
        model: Option<String>,
        /// Overrides OPENAI_API_KEY and the settings file
        #[arg(long)]
        api_key: Option<String>,
        /// Use the lone batch summary as the report when there is one batch
        #[arg(long)]
        no_single_batch_reduce: bool,
    },
}

fn main() -> Result<()> {
    feedback_digest::init_tracing();
    let app = App::parse();

    match app.command {
        Commands::Columns { csv } => {
            let columns = read_columns(&csv)?;
            for name in columns {
                println!("{name}");
            }
        }
        Commands::Preview { csv, rows } => {
            let preview = preview_rows(&csv, rows)?;
            println!("{}", preview.headers.join(" | "));
            for row in preview.rows {
                println!("{}", row.join(" | "));
            }
        }
        Commands::Summarize {
            csv,
            column,
            output,
            batch_size,
            temperature,
            max_tokens,
            model,
            api_key,
            no_single_batch_reduce,
        } => {
            let mut settings =
                Settings::load(app.config.as_deref()).context("Failed to load settings")?;

            let digest = &mut settings.digest;
            if let Some(v) = batch_size {
                digest.batch_size = v;
            }
            if let Some(v) = temperature {
                digest.temperature = v;
            }
            if let Some(v) = max_tokens {
                digest.max_output_tokens = v;
            }
            if let Some(v) = model {
                digest.model = v;
            }
            if no_single_batch_reduce {
                digest.reduce_single_batch = false;
            }
            if api_key.is_some() {
                settings.llm.api_key = api_key;
            }

            // Configuration and credentials are checked before the file is read.
            let runner = DigestRunner::new(settings.digest.clone())?;
            let client = OpenAiClient::from_settings(&settings.llm)?;

            let feedback = load_feedback(&csv, column.as_deref())?;

            let progress = |state: PipelineState| match state {
                PipelineState::Summarizing { current, total } => {
                    tracing::info!("Summarizing batch {current}/{total}");
                }
                PipelineState::Reducing { summary_count } => {
                    tracing::info!("Merging {summary_count} batch summaries");
                }
                _ => {}
            };

            let outcome = runner
                .run(&feedback.items, &client, Some(&progress), None)
                .with_context(|| format!("Error generating insights for {}", csv.display()))?;

            match outcome {
                DigestOutcome::NoFeedback => {
                    eprintln!("{}", outcome.message());
                }
                DigestOutcome::Report(report) => {
                    let markdown = report.to_markdown();
                    match output {
                        Some(path) => {
                            std::fs::write(&path, markdown)
                                .with_context(|| format!("Cannot write {}", path.display()))?;
                            tracing::info!(path = %path.display(), "Report written");
                        }
                        None => print!("{markdown}"),
                    }
                }
            }
        }
    }

    tracing::debug!("{} v{} done", config::APP_NAME, config::APP_VERSION);
    Ok(())
}
