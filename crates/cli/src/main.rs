//! Fundraiser CLI.
//!
//! Walks a donor through a contribution to the Cosmos fundraiser:
//! - Campaign status check
//! - Wallet generation (with recall check) or import
//! - BTC donation through an intermediate address, or an ETH call to execute elsewhere

use anyhow::Result;
use chains::BitcoinNetwork;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod logging;
mod output;
mod terminal;

use config::{Config, ConfigOverrides};
use output::OutputFormatter;

/// Fundraiser CLI
#[derive(Parser)]
#[command(name = "fundraiser")]
#[command(author, version, about = "Interactive Cosmos fundraiser donation client", long_about = None)]
struct Cli {
    /// Bitcoin network: mainnet or testnet (overrides config)
    #[arg(long, global = true, value_parser = parse_network)]
    network: Option<BitcoinNetwork>,

    /// Campaign status endpoint (overrides config)
    #[arg(long, global = true, env = "FUNDRAISER_STATUS_URL")]
    status_url: Option<String>,

    /// Esplora API base URL (overrides config)
    #[arg(long, global = true, env = "FUNDRAISER_ESPLORA_URL")]
    esplora_url: Option<String>,

    /// Ethereum JSON-RPC endpoint (overrides config)
    #[arg(long, global = true, env = "FUNDRAISER_ETH_RPC_URL")]
    eth_rpc_url: Option<String>,

    /// Campaign Bitcoin address (overrides config)
    #[arg(long, global = true, value_name = "ADDRESS")]
    exodus_address: Option<String>,

    /// Fundraiser contract address (overrides config)
    #[arg(long, global = true, value_name = "ADDRESS")]
    contract: Option<String>,

    /// Stop waiting for a BTC payment after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    payment_timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Make a donation (default)
    Donate,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

fn parse_network(s: &str) -> Result<BitcoinNetwork, String> {
    BitcoinNetwork::parse(s).ok_or_else(|| format!("Unknown network '{}': use mainnet or testnet", s))
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            network: self.network,
            status_url: self.status_url.clone(),
            esplora_url: self.esplora_url.clone(),
            eth_rpc_url: self.eth_rpc_url.clone(),
            exodus_address: self.exodus_address.clone(),
            fundraiser_contract: self.contract.clone(),
            payment_timeout_secs: self.payment_timeout,
            no_color: self.no_color,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // Load configuration, then let flags override it
    let mut config = Config::load()?;
    config.apply(cli.overrides());

    let formatter = OutputFormatter::new(config.colored);

    let result = match cli.command.unwrap_or(Commands::Donate) {
        Commands::Donate => commands::donate::donate(&config, formatter).await,
        Commands::Config(ConfigCommands::Show) => commands::config::show(&config, &formatter),
    };

    // Handle errors
    if let Err(e) = result {
        formatter.error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
