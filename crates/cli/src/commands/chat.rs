//! Chat command handler.
//!
//! Interactive session in which ingestion and questions share one
//! process, so the document index and conversation memory persist
//! across turns.

use clap::Args;
use doctalk_agent::AgentService;
use doctalk_core::{config::AppConfig, AppResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::extract::extract_text;

/// Interactive chat session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Document to ingest before the session starts (.txt or .pdf)
    #[arg(short, long)]
    pub document: Option<PathBuf>,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Starting chat session");

        let service = AgentService::from_config(config).await?;

        if let Some(ref path) = self.document {
            ingest_file(&service, path).await?;
        }

        println!("doctalk chat. Use /ingest <path> to load a document, /quit to exit.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush().ok();

            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            if let Some(command) = input.strip_prefix('/') {
                let (name, arg) = match command.split_once(char::is_whitespace) {
                    Some((name, arg)) => (name, arg.trim()),
                    None => (command, ""),
                };

                match name {
                    "quit" | "exit" => break,
                    "ingest" => {
                        if arg.is_empty() {
                            println!("Usage: /ingest <path>");
                        } else if let Err(e) = ingest_file(&service, Path::new(arg)).await {
                            println!("Ingestion failed: {}", e);
                        }
                    }
                    _ => println!("Unknown command: /{}", name),
                }
                continue;
            }

            // A question: retrieval failures and backend errors end up
            // here, reported without ending the session
            match service.chat(input).await {
                Ok(turn) => {
                    for step in &turn.steps {
                        tracing::debug!(
                            "{}({}) -> {}",
                            step.action,
                            step.input,
                            step.observation
                        );
                    }
                    println!("{}", turn.answer);
                }
                Err(e) => println!("Error: {}", e),
            }
        }

        tracing::info!("Chat session ended");
        println!("Bye.");

        Ok(())
    }
}

async fn ingest_file(service: &AgentService, path: &Path) -> AppResult<()> {
    let text = extract_text(path)?;
    let stats = service.ingest_text(&text).await?;

    println!(
        "Ingested {} chunks ({} bytes) in {:.2}s",
        stats.chunks_count, stats.bytes_processed, stats.duration_secs
    );

    Ok(())
}
