//! repsheet-genai - summarize voting records and bills
//!
//! Inputs are JSON/XML files exported by the database layer; outputs are
//! JSON run reports for the loader.

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use repsheet_genai::core::types::canonical::to_canonical_pretty;
use repsheet_genai::utils::logging::init_tracing;
use repsheet_genai::{
    AppConfig, BillVotingRecord, GenerationRequest, ModelTier, Pipeline, SummarizeOptions,
    derive_key,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Exit code when some members or bills got no summary
const INCOMPLETE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "repsheet-genai", version, about)]
struct Cli {
    /// Configuration file (defaults to config/repsheet.yaml when present)
    #[arg(long, global = true, env = "REPSHEET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarize and condense members' voting records
    SummarizeMembers {
        /// JSON object mapping member id to voting records
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        run: RunArgs,
        /// Submit batch prompts as one provider-side job
        #[arg(long)]
        batch: bool,
    },
    /// Summarize bill texts from `<bill-id>.xml` files
    SummarizeBills {
        #[arg(long)]
        bills_dir: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Store the results of a previously submitted batch job in the cache
    CollectBatch {
        /// Job name as reported by the provider, e.g. `batches/123`
        job: String,
    },
    /// Print the cache key a prompt is stored under
    CacheKey {
        prompt_file: PathBuf,
        #[arg(long, value_enum, default_value_t = TierArg::Cost)]
        tier: TierArg,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Report file; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Bypass cache reads and regenerate every answer
    #[arg(long)]
    regenerate: bool,
    /// Write every rendered prompt under this directory
    #[arg(long)]
    dump_prompts: Option<PathBuf>,
}

impl RunArgs {
    fn options(&self, use_batch_api: bool) -> SummarizeOptions {
        SummarizeOptions {
            invalidate_cache: self.regenerate,
            dump_prompts_to: self.dump_prompts.clone(),
            use_batch_api,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TierArg {
    Cost,
    Quality,
}

impl From<TierArg> for ModelTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Cost => ModelTier::Cost,
            TierArg::Quality => ModelTier::Quality,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.logging)?;

    match cli.command {
        Command::SummarizeMembers { input, run, batch } => {
            let members: BTreeMap<String, Vec<BillVotingRecord>> = read_json(&input)?;
            let pipeline = Pipeline::from_config(&config).await?;
            let options = run.options(batch || config.summarization.use_batch_api);

            let report = pipeline.members.summarize_members(&members, &options).await?;
            flush(&pipeline).await;
            write_json(run.output.as_deref(), &report)?;
            if !report.failed.is_empty() {
                warn!("No summary for members: {}", report.failed.join(", "));
            }
            Ok(exit_code(report.is_complete()))
        }
        Command::SummarizeBills { bills_dir, run } => {
            let bills = repsheet_genai::core::summarize::load_bill_texts(&bills_dir)?;
            let pipeline = Pipeline::from_config(&config).await?;

            let report = pipeline.bills.summarize_bills(&bills, &run.options(false)).await?;
            flush(&pipeline).await;
            write_json(run.output.as_deref(), &report)?;
            Ok(exit_code(report.failed.is_empty()))
        }
        Command::CollectBatch { job } => {
            let pipeline = Pipeline::from_config(&config).await?;
            let collection = pipeline.gateway.collect_batch_job(&job).await?;
            flush(&pipeline).await;
            write_json(None, &collection)?;
            Ok(exit_code(collection.errored.is_empty()))
        }
        Command::CacheKey { prompt_file, tier } => {
            let prompt = std::fs::read_to_string(&prompt_file)
                .with_context(|| format!("reading {}", prompt_file.display()))?;
            let model = match ModelTier::from(tier) {
                ModelTier::Cost => &config.gateway.cost_model,
                ModelTier::Quality => &config.gateway.quality_model,
            };
            let mut request = GenerationRequest::new(model.as_str(), prompt);
            if let Some(temperature) = config.gateway.temperature {
                request = request.with_temperature(temperature);
            }
            let (key, _) = derive_key(&request)?;
            println!("{}{}", config.cache.key_prefix, key);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn flush(pipeline: &Pipeline) {
    let written = pipeline.gateway.cache().flush().await;
    let stats = pipeline.gateway.cache().stats();
    info!(
        "Cache: {} hits, {} misses, {} writes ({} pending flushed, {} failed); {} provider calls",
        stats.hits,
        stats.misses,
        stats.writes,
        written,
        stats.failed_writes,
        pipeline.gateway.provider_calls()
    );
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let text = to_canonical_pretty(value, false)?;
    match path {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn exit_code(complete: bool) -> ExitCode {
    if complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(INCOMPLETE)
    }
}
