use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use skycast::api::AppState;
use skycast::{AggregationPipeline, InMemorySavedSearchStore, SkycastConfig, telemetry, web};

#[derive(Parser)]
#[command(name = "skycast", version, about = "Weather, forecast and air quality for any place")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate weather for a place name or "lat,lon" and print it as JSON
    Query {
        /// e.g. "Paris", "coords:48.85,2.35"
        location: String,
    },
    /// Serve the HTTP API
    Serve {
        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = SkycastConfig::load_from_path(cli.config)?;
    telemetry::init_tracing(&config.logging)?;

    let pipeline =
        AggregationPipeline::new(config.clone()).context("Failed to initialize pipeline")?;

    match cli.command {
        Command::Query { location } => {
            let result = pipeline.aggregate(&location).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            info!("Starting Skycast {} on port {}", skycast::VERSION, port);

            let state = AppState {
                pipeline: Arc::new(pipeline),
                saved_searches: Arc::new(InMemorySavedSearchStore::new()),
                scene_generator: None,
            };
            web::run(
                state,
                port,
                Duration::from_secs(config.server.request_deadline_seconds),
            )
            .await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
