//! Cruisesim - cruise ship design chat
//!
#![doc = "Cruisesim - cruise ship design chat"]
#![doc = "Main entry point for the cruisesim application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cruisesim::cli::{Cli, Commands};
use cruisesim::commands;
use cruisesim::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // The name preview never touches configuration or the network
    if let Commands::Name { json, prompt } = &cli.command {
        return commands::name::run_name(prompt.clone(), *json);
    }

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Chat { .. } => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { prompt, save, .. } => {
            tracing::info!("Sending one-shot prompt");
            commands::ask::run_ask(config, prompt, save).await?;
            Ok(())
        }
        Commands::Name { .. } => Ok(()),
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "cruisesim=debug"
    } else {
        "cruisesim=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
