//! Command-line client for the confidential swap: quote, swap, and
//! decrypt-balance against a deployed token/swap pair.

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::{utils::format_units, Address, U256};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use czama_client::chain::{
    parse_eth_amount, ChainReads, HolderWallet, LocalWallet, RpcChainReader, RpcSwapSubmitter,
    SwapSubmits,
};
use czama_client::config::load_config;
use czama_client::relayer::{DecryptionClient, HandleContractPair, HttpRelayer, RelayerHandle};
use czama_client::ClientConfig;

#[derive(Parser)]
#[command(name = "czama-cli")]
#[command(about = "Swap ETH for cZama and decrypt your confidential balance", long_about = None)]
struct Cli {
    /// Path to the client configuration file.
    #[arg(short, long, default_value = "czama.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configured token and swap contract addresses
    Addresses,
    /// Quote the cZama output for an ETH amount
    Quote {
        /// ETH amount, e.g. 0.1
        #[arg(long)]
        eth: String,
    },
    /// Swap ETH for cZama at the fixed rate and wait for confirmation
    Swap {
        /// ETH amount, e.g. 0.1
        #[arg(long)]
        eth: String,
        /// Recipient address (defaults to the signer)
        #[arg(long)]
        recipient: Option<Address>,
    },
    /// Decrypt the confidential balance for the active signer
    DecryptBalance {
        /// Optionally specify a user address (defaults to the signer)
        #[arg(long)]
        user: Option<Address>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "czama_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Addresses => addresses(&config).await,
        Commands::Quote { eth } => quote(&config, &eth).await,
        Commands::Swap { eth, recipient } => swap(&config, &eth, recipient).await,
        Commands::DecryptBalance { user } => decrypt_balance(&config, user).await,
    }
}

async fn addresses(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("ConfidentialZama address is {}", config.contracts.token_address);
    println!("CZamaSwap address is {}", config.contracts.swap_address);
    if !config.contracts.is_configured() {
        println!("warning: contracts are not configured; swap and decrypt are disabled");
        return Ok(());
    }

    let reader = RpcChainReader::from_config(config)?;
    match reader.token_metadata().await {
        Ok((name, symbol, decimals)) => {
            println!("Token            : {} ({}), {} decimals", name, symbol, decimals);
        }
        Err(e) => tracing::warn!(error = %e, "could not read token metadata"),
    }
    Ok(())
}

async fn quote(config: &ClientConfig, eth: &str) -> Result<(), Box<dyn std::error::Error>> {
    let reader = RpcChainReader::from_config(config)?;
    let wei = parse_eth_amount(eth)?;
    let out_units = reader.quote(wei).await?;

    println!("Input            : {} ETH", eth);
    println!("Output           : {} cZama", format_units(U256::from(out_units), 6)?);
    Ok(())
}

async fn swap(
    config: &ClientConfig,
    eth: &str,
    recipient: Option<Address>,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = LocalWallet::from_env()?;
    let submitter = RpcSwapSubmitter::from_config(config, &wallet)?;

    let receipt = submitter.submit_swap(eth, recipient).await?;
    println!("tx:{} confirmed in block {}", receipt.tx_hash, receipt.block_number);

    show_balance(config, &wallet, receipt.recipient).await
}

async fn decrypt_balance(
    config: &ClientConfig,
    user: Option<Address>,
) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = LocalWallet::from_env()?;
    let holder = user.unwrap_or_else(|| wallet.address());
    show_balance(config, &wallet, holder).await
}

async fn show_balance(
    config: &ClientConfig,
    wallet: &LocalWallet,
    holder: Address,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = RpcChainReader::from_config(config)?;
    let handle = reader.balance_handle(holder).await?;

    println!("User             : {}", holder);
    println!("Encrypted balance: {}", handle);

    if handle.is_zero() {
        println!("Clear balance    : 0");
        return Ok(());
    }

    let relayer: Arc<RelayerHandle<HttpRelayer>> = Arc::new(RelayerHandle::new());
    relayer
        .get_or_init(HttpRelayer::connect(&config.relayer))
        .await?;
    let decryptor = DecryptionClient::new(relayer, config.chain.chain_id, &config.relayer);

    let pairs = [HandleContractPair {
        handle,
        contract_address: reader.token_address(),
    }];
    let result = decryptor.decrypt(&pairs, holder, Some(wallet)).await?;
    let units = result[&handle];

    println!(
        "Clear balance    : {} cZama",
        format_units(U256::from(units), 6)?
    );
    Ok(())
}
