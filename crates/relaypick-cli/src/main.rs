mod directory;
mod quote;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use relaypick_client::DeliveryClient;
use relaypick_flow::DirectoryKind;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "relaypick")]
#[command(about = "Delivery mode, relay point and fee lookup for the checkout backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stores available for in-store pickup
    Stores,
    /// List relay points
    RelayPoints,
    /// List delivery modes and the pricing mode used for relay points
    Modes,
    /// Load a cart and show the fee of every location in a delivery mode
    Quote {
        /// YAML cart snapshot (`total` and `items` of `article_id`/`quantity`)
        #[arg(long)]
        cart: PathBuf,
        /// Delivery mode to open
        #[arg(long, value_enum, default_value = "relay-point")]
        mode: QuoteMode,
        /// Location to select once fees are known
        #[arg(long)]
        select: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum QuoteMode {
    Pickup,
    RelayPoint,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("relaypick: pass a subcommand (see --help)");
        return Ok(());
    };

    let config = relaypick_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let client = Arc::new(DeliveryClient::from_app_config(&config)?);

    match command {
        Commands::Stores => directory::run_list(&client, DirectoryKind::Stores).await,
        Commands::RelayPoints => directory::run_list(&client, DirectoryKind::RelayPoints).await,
        Commands::Modes => directory::run_modes(&client).await,
        Commands::Quote { cart, mode, select } => {
            quote::run_quote(client, &cart, mode, select).await
        }
    }
}
