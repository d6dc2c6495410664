use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cosmwasm_std::{Coin, Uint128};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lottery_deployer::chain::{BuyTicketMsg, ChainClient, ContractSession, GasMode, InstantiateMsg, Signer};
use lottery_deployer::config::Config;

#[derive(Parser)]
#[command(name = "lottery-deployer")]
#[command(about = "Deploy and exercise the lottery-operations contract on Oraichain", version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Seed phrase of the signing account
    #[arg(long, env = "MNEMONIC", hide_env_values = true, global = true)]
    mnemonic: Option<String>,

    /// Lottery-operations contract address
    #[arg(long, env = "CONTRACT_ADDRESS", global = true)]
    contract: Option<String>,

    /// gRPC endpoint of the node
    #[arg(long, env = "GRPC_ENDPOINT", global = true)]
    grpc_endpoint: Option<String>,

    /// Gas price, e.g. 0.001orai
    #[arg(long, env = "GAS_PRICE", global = true)]
    gas_price: Option<String>,

    /// Fixed gas limit; simulates when omitted
    #[arg(long, global = true)]
    gas: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "config.toml")]
        output: String,
    },

    /// Print the address derived from the mnemonic
    Address,

    /// Show a bank balance
    Balance {
        /// Denom to query; defaults to the gas denom
        #[arg(short, long)]
        denom: Option<String>,

        /// Address to query; defaults to the signer
        #[arg(short, long)]
        address: Option<String>,
    },

    /// Upload contract wasm code
    Upload {
        #[arg(short, long)]
        wasm: PathBuf,
    },

    /// Instantiate uploaded code
    Instantiate {
        #[arg(long)]
        code_id: u64,

        /// Contract owner; defaults to the signer
        #[arg(long)]
        owner: Option<String>,

        #[arg(long)]
        lottery_contract: Option<String>,

        #[arg(long)]
        oraiswap_router: Option<String>,

        /// Ticket price as amount and denom, e.g. 1000000USDT
        #[arg(long)]
        ticket_price: Option<String>,

        /// Round length in seconds
        #[arg(long)]
        round_duration: Option<u64>,

        #[arg(long)]
        label: Option<String>,

        /// Admin allowed to migrate the contract
        #[arg(long)]
        admin: Option<String>,
    },

    /// Query the current ticket price
    TicketPrice,

    /// Query the contract configuration
    #[command(name = "config")]
    ContractConfig,

    /// Buy a lottery ticket
    BuyTicket {
        #[arg(short, long, default_value = "0")]
        amount: String,
    },

    /// Check balance, query the price, buy a ticket and report
    Run {
        #[arg(short, long, default_value = "0")]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lottery_deployer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Commands::Init { output } = &cli.command {
        let config = Config::default();
        config.save(output)?;
        info!("Configuration file created at: {}", output);
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(endpoint) = &cli.grpc_endpoint {
        config.chain.grpc_endpoint = endpoint.clone();
    }
    if let Some(gas_price) = &cli.gas_price {
        config.chain.gas_price = gas_price.clone();
    }
    if let Some(contract) = &cli.contract {
        config.contract.address = contract.clone();
    }

    let client = Arc::new(ChainClient::new(config.client_config()?));
    let result = run_command(&cli, &config, client.clone()).await;

    // Release the session whether or not the command succeeded
    client.disconnect();
    result
}

fn load_signer(cli: &Cli, config: &Config) -> Result<Arc<Signer>> {
    let Some(mnemonic) = cli.mnemonic.as_deref() else {
        bail!("MNEMONIC is not set");
    };
    let signer = Signer::from_mnemonic_with_coin_type(
        mnemonic,
        &config.chain.address_prefix,
        config.chain.coin_type,
    )?;
    Ok(Arc::new(signer))
}

fn gas_mode(cli: &Cli, client: &ChainClient) -> GasMode {
    match cli.gas {
        Some(gas_limit) => GasMode::Explicit(gas_limit),
        None => client.default_gas_mode(),
    }
}

fn open_session(cli: &Cli, config: &Config, client: Arc<ChainClient>, signer: Arc<Signer>) -> Result<ContractSession> {
    if config.contract.address.is_empty() {
        bail!("No contract address: set CONTRACT_ADDRESS or [contract].address");
    }
    let gas = gas_mode(cli, &client);
    Ok(ContractSession::new(client, signer, &config.contract.address)?.with_gas(gas))
}

/// Parse "<amount><denom>" such as "1000000USDT"
fn parse_coin(s: &str) -> Result<Coin> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .with_context(|| format!("'{}' has no denom", s))?;
    let (amount, denom) = s.split_at(split);
    let amount: Uint128 = amount
        .parse()
        .with_context(|| format!("'{}' has no valid amount", s))?;
    Ok(Coin::new(amount.u128(), denom))
}

async fn run_command(cli: &Cli, config: &Config, client: Arc<ChainClient>) -> Result<()> {
    let signer = load_signer(cli, config)?;
    info!("Signer address: {}", signer.address());

    if let Commands::Address = cli.command {
        return Ok(());
    }

    client.connect().await?;

    match &cli.command {
        Commands::Init { .. } | Commands::Address => {}
        Commands::Balance { denom, address } => {
            let denom = denom.clone().unwrap_or_else(|| client.gas_price().denom.clone());
            let address = address.as_deref().unwrap_or(signer.address());
            let balance = client.get_balance(address, &denom).await?;
            info!("Balance of {}: {}{}", address, balance.amount, balance.denom);
        }
        Commands::Upload { wasm } => {
            let wasm_byte_code = std::fs::read(wasm)
                .with_context(|| format!("reading {}", wasm.display()))?;
            let result =
                ContractSession::upload_code(&client, &signer, wasm_byte_code, gas_mode(cli, &client)).await?;
            info!("Code id: {}", result.code_id);
            info!("Transaction: {}", result.transaction.transaction_hash);
        }
        Commands::Instantiate {
            code_id,
            owner,
            lottery_contract,
            oraiswap_router,
            ticket_price,
            round_duration,
            label,
            admin,
        } => {
            let owner = owner.as_deref().unwrap_or(signer.address());
            let lottery_contract = lottery_contract
                .as_deref()
                .unwrap_or(&config.contract.lottery_contract);
            let oraiswap_router = oraiswap_router
                .as_deref()
                .unwrap_or(&config.contract.oraiswap_router);

            let mut msg = InstantiateMsg::new(owner, lottery_contract, oraiswap_router)?;
            if let Some(price) = ticket_price {
                msg = msg.with_ticket_price(parse_coin(price)?);
            }
            if let Some(seconds) = round_duration {
                msg = msg.with_round_duration(*seconds);
            }

            let label = label.as_deref().unwrap_or(&config.contract.label);
            let (session, result) = ContractSession::instantiate(
                client.clone(),
                signer.clone(),
                *code_id,
                &msg,
                label,
                admin.as_deref(),
                gas_mode(cli, &client),
            )
            .await?;
            info!("Contract address: {}", session.contract_address());
            info!("Transaction: {}", result.transaction.transaction_hash);
        }
        Commands::TicketPrice => {
            let session = open_session(cli, config, client.clone(), signer.clone())?;
            let price = session.get_ticket_price().await?;
            info!("Ticket price: {}{}", price.amount, price.denom);
        }
        Commands::ContractConfig => {
            let session = open_session(cli, config, client.clone(), signer.clone())?;
            let contract_config = session.get_config().await?;
            info!("Owner: {}", contract_config.owner);
            info!("Lottery contract: {}", contract_config.lottery_contract);
            info!("Oraiswap router: {}", contract_config.oraiswap_router);
        }
        Commands::BuyTicket { amount } => {
            let session = open_session(cli, config, client.clone(), signer.clone())?;
            let msg = BuyTicketMsg::parse(amount)?;
            let result = session.buy_ticket(msg.amount).await?;
            info!("Ticket bought in {}", result.transaction_hash);
            info!("Gas used: {}/{}", result.gas_used, result.gas_wanted);
        }
        Commands::Run { amount } => {
            let session = open_session(cli, config, client.clone(), signer.clone())?;
            run_workflow(&session, amount).await?;
        }
    }

    Ok(())
}

async fn run_workflow(session: &ContractSession, amount: &str) -> Result<()> {
    let msg = BuyTicketMsg::parse(amount)?;
    let client = session.client();
    let denom = client.gas_price().denom.clone();

    let balance = client.get_balance(session.signer().address(), &denom).await?;
    info!("Balance: {}{}", balance.amount, balance.denom);

    let price = session.get_ticket_price().await?;
    info!("Ticket price: {}{}", price.amount, price.denom);

    let result = session.buy_ticket(msg.amount).await?;
    info!("=== TICKET BOUGHT ===");
    info!("Transaction: {}", result.transaction_hash);
    info!("Height: {}", result.height);
    info!("Gas used: {}/{}", result.gas_used, result.gas_wanted);
    for event in result.raw_events.iter().filter(|e| e.kind == "wasm") {
        for attr in &event.attributes {
            info!("  {} = {}", attr.key, attr.value);
        }
    }

    let price_after = session.get_ticket_price().await?;
    if price_after != price {
        warn!("Ticket price changed to {}{}", price_after.amount, price_after.denom);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coin() {
        let coin = parse_coin("1000000USDT").unwrap();
        assert_eq!(coin.amount, Uint128::new(1_000_000));
        assert_eq!(coin.denom, "USDT");

        assert!(parse_coin("1000000").is_err());
        assert!(parse_coin("USDT").is_err());
    }

    #[test]
    fn test_cli_parses_workflow() {
        let cli = Cli::try_parse_from([
            "lottery-deployer",
            "--gas",
            "250000",
            "--contract",
            "orai1contract",
            "buy-ticket",
            "--amount",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.gas, Some(250_000));
        assert_eq!(cli.contract.as_deref(), Some("orai1contract"));
        assert!(matches!(cli.command, Commands::BuyTicket { ref amount } if amount == "5"));
    }
}
