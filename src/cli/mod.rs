pub mod commands;
pub mod config;
pub mod render;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::ClientConfig;

#[derive(Parser)]
#[command(name = "watches")]
#[command(about = "Luxury watch storefront - browse the catalog and manage it as an administrator")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Catalog API base URL (overrides WATCH_STORE_API_URL)")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse and manage the watch catalog")]
    Watch {
        #[command(subcommand)]
        cmd: commands::watch::WatchCommands,
    },

    #[command(about = "Catalog API connection")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: resolved config, restored session, client
pub struct Context {
    pub output: OutputFormat,
    pub config: ClientConfig,
    pub api: ApiClient,
}

impl Context {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = crate::config::config().clone();
        if let Some(url) = &cli.api_url {
            config = config.with_base_url(url.clone());
        }

        let session = config::load_session(&config)?.shared();
        let api = ApiClient::new(&config, session)?;

        Ok(Self {
            output: OutputFormat::from_cli(cli),
            config,
            api,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load(&cli)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, ctx).await,
        Commands::Watch { cmd } => commands::watch::handle(cmd, ctx).await,
        Commands::Server { cmd } => commands::server::handle(cmd, ctx).await,
    }
}
