//! KryptoBird terminal front end
//!
//! Drives the full client workflow against a development chain:
//! 1. Detect the wallet provider
//! 2. Load the contract session (account, network, deployment, tokens)
//! 3. Show status, list tokens, or mint a new one

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kryptobird::{
    artifact::ContractArtifact,
    chain::{BirdzContract, WalletProvider},
    provider::{detect_provider, ProviderConfig},
    session::Session,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, help = "JSON-RPC endpoint of the wallet provider")]
    endpoint: Option<String>,
    #[arg(long, help = "Path to the KryptoBird build artifact")]
    artifact: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the active account, network, and collection summary
    Status,
    /// List every token URI in index order
    List,
    /// Mint a new token carrying the given URI
    Mint { token_uri: String },
}

/// The `--endpoint` flag wins over `KRYPTOBIRD_RPC_URL`.
fn get_endpoint(cli_endpoint: Option<String>) -> String {
    cli_endpoint
        .or_else(|| std::env::var("KRYPTOBIRD_RPC_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:7545".to_string())
}

/// The `--artifact` flag wins over `KRYPTOBIRD_ARTIFACT`.
fn get_artifact_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| std::env::var("KRYPTOBIRD_ARTIFACT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("abis/KryptoBird.json"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let endpoint = get_endpoint(args.endpoint);
    let artifact_path = get_artifact_path(args.artifact);

    let artifact = ContractArtifact::load(&artifact_path)?;

    // detect the wallet provider
    let provider = detect_provider(&ProviderConfig {
        endpoint: endpoint.clone(),
    })
    .await?;
    println!("✓ Wallet provider detected at {endpoint}");

    // load the contract session
    let mut session = Session::new();
    session.load(&provider, &artifact).await?;
    println!("✓ Session loaded: {} tokens", session.token_count());

    match args.command {
        Command::Status => {
            let account = session
                .account()
                .context("Session loaded without an account")?;
            let contract = session
                .contract()
                .context("Session loaded without a contract handle")?;
            let network_id = provider
                .network_id()
                .await
                .context("Failed to read network id")?;
            let name = contract
                .name()
                .await
                .context("Failed to read collection name")?;
            let symbol = contract
                .symbol()
                .await
                .context("Failed to read collection symbol")?;

            println!();
            println!("Account:    {account}");
            println!("Network id: {network_id}");
            println!("Collection: {name} ({symbol}) at {}", contract.address());
            if let Some(tx) = artifact
                .deployment_record(network_id)
                .and_then(|record| record.transaction_hash)
            {
                println!("Deploy tx:  {tx}");
            }
            println!("Tokens:     {}", session.token_count());
        }
        Command::List => {
            println!();
            for (index, uri) in session.tokens().iter().enumerate() {
                println!("#{} {uri}", index + 1);
            }
        }
        Command::Mint { token_uri } => {
            let receipt = session.mint(&token_uri).await?;
            println!("✓ Mint confirmed");
            println!("  Transaction: {}", receipt.tx_hash);
            if let Some(block) = receipt.block_number {
                println!("  Block:       {block}");
            }
            match receipt.transfer {
                Some(transfer) => println!("  Token #{}:   {token_uri}", transfer.token_id),
                None => println!("  Token #{}:   {token_uri}", session.token_count()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_flag_beats_environment() {
        std::env::set_var("KRYPTOBIRD_RPC_URL", "http://127.0.0.1:9999");
        let flag = Some("http://10.0.0.1:7545".to_string());
        assert_eq!(get_endpoint(flag), "http://10.0.0.1:7545");
        assert_eq!(get_endpoint(None), "http://127.0.0.1:9999");

        std::env::remove_var("KRYPTOBIRD_RPC_URL");
        assert_eq!(get_endpoint(None), "http://127.0.0.1:7545");
    }

    #[test]
    fn artifact_flag_beats_environment() {
        std::env::set_var("KRYPTOBIRD_ARTIFACT", "env/KryptoBird.json");
        let flag = Some(PathBuf::from("flag/KryptoBird.json"));
        assert_eq!(get_artifact_path(flag), PathBuf::from("flag/KryptoBird.json"));
        assert_eq!(get_artifact_path(None), PathBuf::from("env/KryptoBird.json"));

        std::env::remove_var("KRYPTOBIRD_ARTIFACT");
        assert_eq!(get_artifact_path(None), PathBuf::from("abis/KryptoBird.json"));
    }
}
