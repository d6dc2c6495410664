//! End-to-end checks against a running node.
//!
//! The ignored tests need GRPC_ENDPOINT, MNEMONIC and CONTRACT_ADDRESS
//! (plus optional CHAIN_ID and GAS_PRICE) and a funded account:
//! `cargo test --test live_node -- --ignored`

use std::sync::Arc;

use cosmwasm_std::Uint128;
use lottery_deployer::chain::messages::RawMessage;
use lottery_deployer::chain::{
    derive_account, ChainClient, ChainError, ClientConfig, ContractSession, GasMode, Signer,
};

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{} must be set for live tests", key))
}

async fn live_session() -> (Arc<ChainClient>, ContractSession) {
    let mut config = ClientConfig {
        grpc_endpoint: env("GRPC_ENDPOINT"),
        ..Default::default()
    };
    if let Ok(chain_id) = std::env::var("CHAIN_ID") {
        config.chain_id = chain_id;
    }
    if let Ok(gas_price) = std::env::var("GAS_PRICE") {
        config.gas_price = gas_price.parse().unwrap();
    }

    let client = Arc::new(ChainClient::connect_with(config).await.unwrap());
    let signer = Arc::new(Signer::from_mnemonic(&env("MNEMONIC"), "orai").unwrap());
    let session = ContractSession::new(client.clone(), signer, &env("CONTRACT_ADDRESS")).unwrap();
    (client, session)
}

#[test]
fn derivation_is_deterministic() {
    let first = derive_account(TEST_MNEMONIC, "orai").unwrap();
    let second = derive_account(TEST_MNEMONIC, "orai").unwrap();
    assert_eq!(first, second);
    assert!(first.address.starts_with("orai1"));

    assert!(matches!(
        derive_account("abandon abandon abandon", "orai"),
        Err(ChainError::InvalidMnemonic(_))
    ));
}

#[tokio::test]
async fn session_requires_connection() {
    let client = Arc::new(ChainClient::new(ClientConfig::default()));
    let signer = Arc::new(Signer::from_mnemonic(TEST_MNEMONIC, "orai").unwrap());
    let contract = signer.address().to_string();
    let session = ContractSession::new(client.clone(), signer, &contract).unwrap();

    assert!(matches!(
        session.get_ticket_price().await,
        Err(ChainError::NotConnected { .. })
    ));
    client.disconnect();
    client.disconnect();
}

#[tokio::test]
#[ignore]
async fn buy_ticket_scenario() {
    let (client, session) = live_session().await;
    let sender = session.signer().address().to_string();

    let balance = client.get_balance(&sender, "orai").await.unwrap();
    assert!(!balance.amount.is_zero());

    let price_before = session.get_ticket_price().await.unwrap();

    let result = session.buy_ticket(Uint128::zero()).await.unwrap();
    assert!(!result.transaction_hash.is_empty());
    assert!(result.gas_used <= result.gas_wanted);

    let price_after = session.get_ticket_price().await.unwrap();
    assert_eq!(price_before, price_after);

    // The hash can be looked up after inclusion
    let found = client.get_tx(&result.transaction_hash).await.unwrap();
    assert_eq!(found.map(|tx| tx.height), Some(result.height));

    client.disconnect();
}

#[tokio::test]
#[ignore]
async fn empty_denom_balance_is_zero() {
    let (client, session) = live_session().await;
    let balance = client
        .get_balance(session.signer().address(), "nonexistentdenom")
        .await
        .unwrap();
    assert!(balance.amount.is_zero());
    client.disconnect();
}

#[tokio::test]
#[ignore]
async fn unknown_query_is_contract_rejection() {
    let (client, session) = live_session().await;
    let msg = RawMessage::parse(r#"{"no_such_query":{}}"#).unwrap();
    let result = session.query::<_, serde_json::Value>(&msg).await;
    assert!(matches!(result, Err(ChainError::ContractQueryError { .. })));
    client.disconnect();
}

#[tokio::test]
#[ignore]
async fn unaffordable_fee_is_rejected_before_broadcast() {
    let (client, session) = live_session().await;
    let sender = session.signer().address().to_string();
    let before = client.get_balance(&sender, "orai").await.unwrap();

    // A gas limit whose fee exceeds any realistic balance
    let session = session.with_gas(GasMode::Explicit(u64::MAX / 2));
    let result = session.buy_ticket(Uint128::zero()).await;
    assert!(matches!(result, Err(ChainError::InsufficientFunds { .. })));

    let after = client.get_balance(&sender, "orai").await.unwrap();
    assert_eq!(before, after);
    client.disconnect();
}
