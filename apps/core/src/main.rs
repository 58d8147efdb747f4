// HealthRisk CLI Entry Point

use anyhow::Context;
use clap::{Parser, Subcommand};
use healthrisk_core::preflight::run_preflight;
use healthrisk_core::storage::DEFAULT_HISTORY_LIMIT;
use healthrisk_core::{AppConfig, AssessmentService, ClinicalInput};
use std::path::PathBuf;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "healthrisk")]
#[command(about = "Population-level health risk estimation with prevention guidance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a questionnaire stored as JSON
    Assess {
        /// Path to the ClinicalInput JSON file
        input: PathBuf,
        /// Do not append the result to the encrypted history
        #[arg(long)]
        no_save: bool,
    },
    /// Show the most recent stored assessments
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
    /// Check model artifacts, storage and the explanation backend
    Preflight {
        /// Also send a short test completion to the backend
        #[arg(long)]
        ping_backend: bool,
    },
}

/// Human-readable logs on stderr; `LOG_FORMAT=json` switches to Bunyan JSON.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then_some(JsonStorageLayer))
        .with(json.then(|| BunyanFormattingLayer::new("healthrisk".into(), std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Assess { input, no_save } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            let clinical: ClinicalInput =
                serde_json::from_str(&raw).context("Questionnaire is not a valid ClinicalInput")?;

            let service = AssessmentService::from_config(&config)?;
            let response = if no_save {
                service.assess_without_saving(&clinical).await?
            } else {
                service.assess(&clinical).await?
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::History { limit } => {
            let service = AssessmentService::from_config(&config)?;
            let records = service.recent(limit)?;
            info!("Loaded {} stored assessments", records.len());
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Preflight { ping_backend } => {
            let report = run_preflight(&config, ping_backend).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.ready_to_serve {
                anyhow::bail!("{}", report.summary);
            }
        }
    }

    Ok(())
}
