//! Ask command handler.
//!
//! One-shot question answering: optionally ingest a document, then run
//! the reasoning agent once and print the answer.

use clap::Args;
use doctalk_agent::AgentService;
use doctalk_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

use crate::extract::extract_text;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Document to ingest before asking (.txt or .pdf)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Output as JSON (includes reasoning steps)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let service = AgentService::from_config(config).await?;

        if let Some(ref path) = self.document {
            let text = extract_text(path)?;
            let stats = service.ingest_text(&text).await?;
            tracing::info!(
                "Ingested {:?}: {} chunks, {} bytes",
                path,
                stats.chunks_count,
                stats.bytes_processed
            );
        }

        let turn = service.chat(&self.question).await?;

        if self.json {
            // Output as structured JSON with the reasoning trace
            let output = serde_json::json!({
                "question": turn.question,
                "answer": turn.answer,
                "iterations": turn.iterations,
                "reasoning": turn.steps,
            });

            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // Output the answer to stdout, the trace to stderr when verbose
            if tracing::enabled!(tracing::Level::DEBUG) {
                for (i, step) in turn.steps.iter().enumerate() {
                    tracing::debug!(
                        "Step {}: {}({}) -> {}",
                        i + 1,
                        step.action,
                        step.input,
                        step.observation
                    );
                }
            }

            println!("{}", turn.answer);
        }

        Ok(())
    }
}
