// Model Router
// Main entry point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use model_router::config::{load_config, AppConfig};
use model_router::handlers::create_routes;
use model_router::host::EventHost;
use model_router::{ModelRouter, ServingContext};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "model-router")]
#[command(about = "Route inference requests to registered models", version)]
struct Args {
    /// Config file (default: ~/.model-router/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the declared models over HTTP
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the declared models in routing order
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Serve { bind } => run_serve(config, bind).await,
        Command::Models => {
            for (idx, model) in config.models.iter().enumerate() {
                let target = model.url.as_deref().unwrap_or("-");
                println!("{}. {} ({:?}) {}", idx + 1, model.name, model.kind, target);
            }
            Ok(())
        }
    }
}

async fn run_serve(mut config: AppConfig, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }

    let routes = create_routes(&config.models)?;
    let context =
        ServingContext::new(config.router.name.clone(), config.router.fetch_timeout())?;
    let router = ModelRouter::new(context, routes, config.router.clone())
        .context("Failed to build model router")?;
    let host = Arc::new(EventHost::new(router)?);

    model_router::server::serve(host, &config.server).await
}

/// Initialize tracing
///
/// Default: INFO level, can be overridden with RUST_LOG env var
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}
