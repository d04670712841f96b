//! Search command handler.
//!
//! Retrieval inspection: optionally ingest a document, embed the query
//! and print the nearest chunks with their similarity scores.

use clap::Args;
use doctalk_agent::AgentService;
use doctalk_core::{config::AppConfig, AppResult};
use doctalk_knowledge::ScoredChunk;
use std::path::PathBuf;

use crate::extract::extract_text;

/// Inspect retrieval results for a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The query to search for
    pub query: String,

    /// Document to ingest before searching (.txt or .pdf)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Number of chunks to retrieve (default: retrieval.topK from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    /// Execute the search command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");
        tracing::debug!("Search command options: {:?}", self);

        let service = AgentService::from_config(config).await?;

        if let Some(ref path) = self.document {
            let text = extract_text(path)?;
            let stats = service.ingest_text(&text).await?;
            tracing::info!("Ingested {:?}: {} chunks", path, stats.chunks_count);
        }

        let k = self.top_k.unwrap_or(config.retrieve_k);
        let results = service.search(&self.query, k).await?;

        tracing::debug!("Retrieved {} chunks for query", results.len());

        print_results(&results, self.json)
    }
}

fn print_results(results: &[ScoredChunk], json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, scored) in results.iter().enumerate() {
        println!(
            "[{}] score {:.3} (chunk {})",
            i + 1,
            scored.score,
            scored.chunk.position
        );
        println!("{}", scored.chunk.text.trim());
        println!();
    }

    Ok(())
}
