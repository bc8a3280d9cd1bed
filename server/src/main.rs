use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{config::Configuration, error::ServerError, rest::serve_dashboard};

mod config;
mod error;
mod rest;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
}

impl Args {
    async fn get_config_file(&self) -> Result<Configuration, ServerError> {
        Configuration::from_file(&self.config).await
    }
}

#[tokio::main(worker_threads = 2)]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let config = args.get_config_file().await?;
    tracing::info!(
        backend = %config.dashboard.backend_url,
        project = %config.dashboard.firebase.project_id,
        "loaded configuration from {}",
        args.config.display()
    );
    serve_dashboard(&config).await
}
