//! AssetDesk CLI - asset registry and assistant chat from the terminal.

use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use assetdesk_client::config::{API_BASE_ENV, DEFAULT_API_BASE_URL};
use assetdesk_client::{ClientConfig, HttpClient};
use assetdesk_core::asset::parse_purchase_date;
use assetdesk_core::{AssetDraft, AssetId, AssetStatus, CoreError};

mod assets;
mod chat;

/// AssetDesk CLI - asset registry and AI assistant
#[derive(Parser)]
#[command(name = "assetdesk")]
#[command(about = "CLI for the AssetDesk asset registry and assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = API_BASE_ENV, default_value = DEFAULT_API_BASE_URL)]
    api_base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the asset registry
    #[command(subcommand)]
    Assets(AssetCommand),

    /// Chat with the assistant
    Chat {
        /// Milliseconds between revealed characters
        #[arg(long, default_value = "20")]
        reveal_ms: u64,
    },

    /// Ask the assistant one question and print the answer
    Ask {
        /// Question text
        question: String,

        /// Milliseconds between revealed characters
        #[arg(long, default_value = "20")]
        reveal_ms: u64,
    },

    /// Check that the backend is reachable
    Health,
}

#[derive(Subcommand)]
enum AssetCommand {
    /// List all assets
    List,

    /// Show one asset
    Get {
        /// Asset ID
        id: String,
    },

    /// Add a new asset
    Create {
        #[command(flatten)]
        fields: NewAssetArgs,
    },

    /// Change an asset; omitted fields keep their current value
    Update {
        /// Asset ID
        id: String,

        #[command(flatten)]
        changes: AssetChangeArgs,
    },

    /// Delete an asset
    Delete {
        /// Asset ID
        id: String,
    },
}

#[derive(Args)]
struct NewAssetArgs {
    /// Asset name
    #[arg(long)]
    name: String,

    /// Category, e.g. Electronics or Furniture
    #[arg(long)]
    category: String,

    /// Monetary value
    #[arg(long)]
    value: f64,

    /// Active, Maintenance or Retired
    #[arg(long, default_value = "Active", value_parser = parse_status)]
    status: AssetStatus,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_purchase_date)]
    purchase_date: NaiveDate,
}

impl NewAssetArgs {
    fn into_draft(self) -> AssetDraft {
        AssetDraft {
            name: self.name,
            category: self.category,
            value: self.value,
            status: self.status,
            purchase_date: Some(self.purchase_date),
        }
    }
}

#[derive(Args)]
struct AssetChangeArgs {
    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New category
    #[arg(long)]
    category: Option<String>,

    /// New monetary value
    #[arg(long)]
    value: Option<f64>,

    /// New status
    #[arg(long, value_parser = parse_status)]
    status: Option<AssetStatus>,

    /// New purchase date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_purchase_date)]
    purchase_date: Option<NaiveDate>,
}

fn parse_status(s: &str) -> Result<AssetStatus, CoreError> {
    s.parse()
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so chat output on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("assetdesk_client=warn".parse()?)
                .add_directive("assetdesk_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::new(&cli.api_base);
    debug!(api_base = %config.api_base_url, "Using backend");

    match cli.command {
        Commands::Assets(command) => {
            let client = HttpClient::from_config(&config);
            match command {
                AssetCommand::List => assets::list(&client).await?,
                AssetCommand::Get { id } => assets::show(&client, &AssetId::new(id)).await?,
                AssetCommand::Create { fields } => {
                    assets::create(&client, &fields.into_draft()).await?;
                }
                AssetCommand::Update { id, changes } => {
                    let changes = assets::AssetChanges {
                        name: changes.name,
                        category: changes.category,
                        value: changes.value,
                        status: changes.status,
                        purchase_date: changes.purchase_date,
                    };
                    assets::update(&client, &AssetId::new(id), changes).await?;
                }
                AssetCommand::Delete { id } => assets::delete(&client, &AssetId::new(id)).await?,
            }
        }
        Commands::Chat { reveal_ms } => {
            let config = config.with_reveal_interval(Duration::from_millis(reveal_ms));
            chat::run_chat(&config).await?;
        }
        Commands::Ask {
            question,
            reveal_ms,
        } => {
            let config = config.with_reveal_interval(Duration::from_millis(reveal_ms));
            chat::ask(&config, &question).await?;
        }
        Commands::Health => {
            let client = HttpClient::from_config(&config);
            if client.health().await? {
                println!("Backend at {} is healthy", client.base_url());
            } else {
                return Err(format!("Backend at {} is unhealthy", client.base_url()).into());
            }
        }
    }

    Ok(())
}
