//! # Briefing
//!
//! Runs the digest pipeline over one batch of articles and prints the
//! enriched batch as JSON.
//!
//! ## Usage
//!
//! ```
//! # Local Ollama
//! briefing --input batch.json --model llama3.1:8b
//!
//! # OpenAI, API key from OPENAI_API_KEY
//! briefing --input batch.json --provider openai --model gpt-4o-mini
//! ```
//!
//! The batch file holds `{"profile": {...}, "articles": [...]}`. Stage
//! settings come from `BRIEFING_*` environment variables.

use anyhow::{Context, Result};
use briefing::logging::configure_logging;
use briefing::{Article, Cache, InterestProfile, LLMParams, Pipeline, Settings};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Provider {
    Ollama,
    Openai,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Batch file with the interest profile and articles
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Model provider
    #[arg(long, value_enum, env = "BRIEFING_PROVIDER", default_value = "ollama")]
    provider: Provider,

    /// Host for the Ollama server
    #[arg(short = 'H', long, env = "OLLAMA_HOST", default_value = "http://localhost")]
    host: String,

    /// Port for the Ollama server
    #[arg(short = 'p', long, env = "OLLAMA_PORT", default_value = "11434")]
    port: u16,

    /// Model to use
    #[arg(short = 'm', long, env = "BRIEFING_MODEL", default_value = "llama3.1:8b")]
    model: String,

    /// Temperature for generation
    #[arg(short = 'T', long, env = "LLM_TEMPERATURE", default_value = "0.0")]
    temperature: f32,

    /// Directory for the rolling log file
    #[arg(long, env = "BRIEFING_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Batch {
    profile: InterestProfile,
    articles: Vec<Article>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    configure_logging(&args.log_dir);

    let settings = Settings::from_env().context("Failed to load settings")?;

    let raw = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let batch: Batch = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let llm = match args.provider {
        Provider::Ollama => {
            info!("Connecting to Ollama at {}:{}", args.host, args.port);
            LLMParams::ollama(args.host.clone(), args.port, args.model.clone())
        }
        Provider::Openai => {
            info!("Using OpenAI model {}", args.model);
            LLMParams::openai(args.model.clone())
        }
    }
    .with_temperature(args.temperature);

    let pipeline = Pipeline::new(Arc::new(llm), Cache::in_memory());
    let digest = pipeline
        .process(&batch.articles, &batch.profile, &settings)
        .await
        .context("Pipeline rejected the configuration")?;

    println!("{}", serde_json::to_string_pretty(&digest)?);
    Ok(())
}
