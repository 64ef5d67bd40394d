//! token-info CLI.
//!
//! ```text
//! token-info [--config token-info.toml] set --app-id 885279530 --asset-id 885201687
//! token-info wait <TX_ID> --max-rounds 10
//! token-info status
//! ```
//!
//! Secrets come from the environment: `TOKEN_INFO_MNEMONIC` for the signing
//! account and `TOKEN_INFO_ALGOD_TOKEN` for the node API token.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use token_info::blockchain::{AlgodClient, TokenInfo, TxBuilder, Wallet};
use token_info::config::{load_or_default, ConfirmationConfig, TokenInfoConfig};
use token_info::lifecycle::{signals, Shutdown};
use token_info::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "token-info")]
#[command(about = "Set token info on an Algorand application and wait for confirmation", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, sign, submit and confirm a token-info application call
    Set {
        #[arg(long)]
        app_id: Option<u64>,
        #[arg(long)]
        asset_id: Option<u64>,
        #[arg(long)]
        buffer_size: Option<u64>,
        #[arg(long)]
        token_config: Option<u64>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Wait for an already submitted transaction
    Wait {
        tx_id: String,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Show node status
    Status,
}

#[derive(Args)]
struct WaitArgs {
    /// Ledger rounds to wait before giving up.
    #[arg(long)]
    max_rounds: Option<u64>,

    /// Wall-clock bound in seconds, on top of the round budget.
    #[arg(long)]
    deadline_secs: Option<u64>,
}

impl WaitArgs {
    fn resolve(&self, defaults: &ConfirmationConfig) -> (u64, Option<Duration>) {
        let max_rounds = self.max_rounds.unwrap_or(defaults.max_rounds);
        let deadline = self
            .deadline_secs
            .or(defaults.deadline_secs)
            .map(Duration::from_secs);
        (max_rounds, deadline)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("token-info v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let client = AlgodClient::from_env(config.node.clone())?;
    if !client.is_healthy().await {
        tracing::warn!(url = %config.node.url, "algod node unreachable at startup");
    }

    match cli.command {
        Commands::Status => {
            let status = client.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Wait { tx_id, wait } => {
            let (max_rounds, deadline) = wait.resolve(&config.confirmation);
            let shutdown = start_shutdown(deadline);
            let round = token_info::await_confirmation(&client, &tx_id, max_rounds, &shutdown.token())
                .await?;
            println!("Transaction {} confirmed in round {}", tx_id, round);
        }
        Commands::Set {
            app_id,
            asset_id,
            buffer_size,
            token_config,
            wait,
        } => {
            let (app_id, info) = token_info_request(&config, app_id, asset_id, buffer_size, token_config)?;
            let (max_rounds, deadline) = wait.resolve(&config.confirmation);

            let wallet = Wallet::from_env()?;
            let builder = TxBuilder::new(client, wallet, config.transaction.clone());
            let shutdown = start_shutdown(deadline);

            let confirmed = builder
                .execute(&info.into_app_call(app_id), max_rounds, &shutdown.token())
                .await?;

            println!("Tx ID: {}", confirmed.tx_id);
            println!("Confirmed in round: {}", confirmed.confirmed_round);
            match confirmed.app_id {
                Some(id) => println!("Token Info Added to Contract [App-ID]: {}", id),
                None => println!("Token Info Added to Contract [App-ID]: {}", app_id),
            }
        }
    }

    Ok(())
}

fn start_shutdown(deadline: Option<Duration>) -> Shutdown {
    let shutdown = Shutdown::new();
    signals::spawn_ctrl_c_handler(&shutdown);
    if let Some(deadline) = deadline {
        shutdown.trigger_after(deadline);
    }
    shutdown
}

/// Merge CLI flags over the `[app]` config section.
fn token_info_request(
    config: &TokenInfoConfig,
    app_id: Option<u64>,
    asset_id: Option<u64>,
    buffer_size: Option<u64>,
    token_config: Option<u64>,
) -> Result<(u64, TokenInfo), String> {
    let app_id = app_id.unwrap_or(config.app.app_id);
    let asset_id = asset_id.unwrap_or(config.app.asset_id);
    if app_id == 0 {
        return Err("an application id is required (--app-id or [app].app_id)".to_string());
    }
    if asset_id == 0 {
        return Err("an asset id is required (--asset-id or [app].asset_id)".to_string());
    }

    Ok((
        app_id,
        TokenInfo {
            asset_id,
            buffer_size: buffer_size.unwrap_or(config.app.buffer_size),
            token_config: token_config.unwrap_or(config.app.token_config),
        },
    ))
}
