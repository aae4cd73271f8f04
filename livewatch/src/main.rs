mod server;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use livewatch_core::{
    bootstrap::{init_services, load_config},
    logging,
};

use server::LivewatchServer;

#[derive(Parser, Debug)]
#[command(name = "livewatch")]
#[command(about = "Relays YouTube live viewer counts and chat to browsers", long_about = None)]
struct Args {
    /// Path to a YAML/TOML config file
    #[arg(long, short, env = "LIVEWATCH_CONFIG_PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load and validate configuration
    let config = load_config(args.config.as_deref())?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("livewatch starting...");
    info!(video_id = %config.youtube.video_id, "HTTP address: {}", config.http_address());

    // 3. Wire services
    let services = init_services(&config)?;

    // 4. Run until shutdown
    LivewatchServer::new(config, services).start().await
}
