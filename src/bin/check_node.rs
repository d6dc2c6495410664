/// Read-only smoke check against a node: connection, balance, contract queries
/// Run with: cargo run --bin check_node
/// Uses config.toml when present plus GRPC_ENDPOINT, GAS_PRICE, CONTRACT_ADDRESS, MNEMONIC

use std::sync::Arc;

use anyhow::Result;
use lottery_deployer::chain::{ChainClient, ChainError, ContractSession, Signer};
use lottery_deployer::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    println!("=== Lottery Node Check ===\n");

    let mut config = Config::load_or_default("config.toml")?;
    config.apply_env();

    let mnemonic = std::env::var("MNEMONIC").unwrap_or_else(|_| {
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
            .to_string()
    });
    let signer = Arc::new(Signer::from_mnemonic_with_coin_type(
        &mnemonic,
        &config.chain.address_prefix,
        config.chain.coin_type,
    )?);
    println!("Wallet address: {}", signer.address());

    let client = Arc::new(ChainClient::new(config.client_config()?));

    // Queries must fail cleanly before connect
    match client.get_balance(signer.address(), "orai").await {
        Err(ChainError::NotConnected { .. }) => println!("✅ NotConnected before connect()"),
        other => println!("❌ Expected NotConnected, got {:?}", other),
    }

    println!("Connecting to {}...", config.chain.grpc_endpoint);
    client.connect().await?;
    println!("Connected!\n");

    let result = check(&client, signer, &config).await;
    client.disconnect();
    result
}

async fn check(client: &Arc<ChainClient>, signer: Arc<Signer>, config: &Config) -> Result<()> {
    println!("=== Balance ===");
    let denom = client.gas_price().denom.clone();
    match client.get_balance(signer.address(), &denom).await {
        Ok(balance) => println!("✅ {}{}", balance.amount, balance.denom),
        Err(e) => println!("❌ Balance query failed: {}", e),
    }

    match client.get_balance(signer.address(), "no-such-denom").await {
        Ok(balance) => println!("✅ Unknown denom reports {}", balance.amount),
        Err(e) => println!("❌ Unknown denom failed: {}", e),
    }
    println!();

    println!("=== Account ===");
    let account = client.query_account(signer.address()).await?;
    println!("  account_number: {}", account.account_number);
    println!("  sequence: {}", account.sequence);
    println!();

    if config.contract.address.is_empty() {
        println!("No CONTRACT_ADDRESS set, skipping contract queries");
        return Ok(());
    }

    let session = ContractSession::new(client.clone(), signer, &config.contract.address)?;

    println!("=== Ticket Price ===");
    match session.get_ticket_price().await {
        Ok(price) => println!("✅ {}{}", price.amount, price.denom),
        Err(e) => println!("❌ Ticket price query failed: {}", e),
    }

    println!("=== Config ===");
    match session.get_config().await {
        Ok(cfg) => {
            println!("✅ owner: {}", cfg.owner);
            println!("  lottery_contract: {}", cfg.lottery_contract);
            println!("  oraiswap_router: {}", cfg.oraiswap_router);
        }
        Err(e) => println!("❌ Config query failed: {}", e),
    }

    println!("=== Unknown Query ===");
    let unknown = lottery_deployer::chain::messages::RawMessage::parse(r#"{"no_such_query":{}}"#)?;
    match session.query::<_, serde_json::Value>(&unknown).await {
        Err(ChainError::ContractQueryError { message, .. }) => {
            println!("✅ Rejected by contract: {}", message)
        }
        other => println!("❌ Expected ContractQueryError, got {:?}", other),
    }

    Ok(())
}
