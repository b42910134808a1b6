//! Postal code weather relay.
//!
//! ```text
//!  client ──POST {"cep"}──▶ edge ──forward──▶ resolver ──GET──▶ geocoding
//!    ▲                       │                   │
//!    └──── status + body ────┘                   └──GET──▶ weather
//! ```
//!
//! `cep-relay [--config FILE] edge|resolver`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cep_relay::config::{load_or_default, Role};
use cep_relay::lifecycle::{launch, signals, Shutdown};
use cep_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "cep-relay")]
#[command(about = "Postal code to current weather relay", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "CEP_RELAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate postal codes and forward them to the resolver
    Edge,
    /// Resolve postal codes to current weather
    Resolver,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let role = match cli.command {
        Commands::Edge => Role::Edge,
        Commands::Resolver => Role::Resolver,
    };

    let config = load_or_default(cli.config.as_deref(), role)?;
    init_logging(&config.observability)?;

    tracing::info!(
        role = %role,
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.bind_address(role),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let server = launch(role, config, &shutdown);
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = signals::wait_for_signal() => {
            shutdown.trigger();
            server.await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
