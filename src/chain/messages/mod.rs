mod buy_ticket;
mod instantiate;
mod query;

pub use buy_ticket::BuyTicketMsg;
pub use instantiate::InstantiateMsg;
pub use query::{ConfigResponse, TicketPriceResponse};

use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chain::error::{ChainError, Result};

/// A message sent to a contract: a single-key JSON object naming the
/// operation, e.g. `{"buy_ticket":{"amount":"0"}}`.
pub trait ContractMessage: Serialize {
    /// Operation name used in logs and error context
    fn operation(&self) -> String;

    /// Canonical JSON encoding, checked to be a single-key object
    fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let value = serde_json::to_value(self)?;
        ensure_single_key(&value)?;
        Ok(serde_json::to_vec(&value)?)
    }
}

/// Execute messages of the lottery-operations contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    BuyTicket { amount: Uint128 },
}

/// Query messages understood by the lottery-operations contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    GetTicketPrice {},
    Config {},
}

impl ContractMessage for ExecuteMsg {
    fn operation(&self) -> String {
        match self {
            ExecuteMsg::BuyTicket { .. } => "buy_ticket".to_string(),
        }
    }
}

impl ContractMessage for QueryMsg {
    fn operation(&self) -> String {
        match self {
            QueryMsg::GetTicketPrice {} => "get_ticket_price".to_string(),
            QueryMsg::Config {} => "config".to_string(),
        }
    }
}

/// Arbitrary message for contracts without a typed schema here
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage(Value);

impl RawMessage {
    pub fn new(value: Value) -> Result<Self> {
        ensure_single_key(&value)?;
        Ok(Self(value))
    }

    pub fn parse(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }
}

impl Serialize for RawMessage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl ContractMessage for RawMessage {
    fn operation(&self) -> String {
        self.0
            .as_object()
            .and_then(|o| o.keys().next().cloned())
            .unwrap_or_default()
    }
}

fn ensure_single_key(value: &Value) -> Result<()> {
    match value.as_object() {
        Some(obj) if obj.len() == 1 => Ok(()),
        _ => Err(ChainError::InvalidArgument(format!(
            "contract message must be a single-key object, got {}",
            value
        ))),
    }
}
