/// Plain data types shared by the signer, the client and contract sessions

use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};

/// An on-chain identity derived from a mnemonic.
/// Holds only public data; the private key stays inside the `Signer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    /// Compressed secp256k1 public key (33 bytes)
    pub public_key: Vec<u8>,
}

/// A 64-byte compact secp256k1 signature (r || s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// Snapshot of one denom held by an address at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub denom: String,
    pub amount: Uint128,
}

impl Balance {
    pub fn zero(denom: &str) -> Self {
        Self {
            denom: denom.to_string(),
            amount: Uint128::zero(),
        }
    }
}

/// An ABCI event emitted while executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<EventAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

impl Event {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Outcome of a state-changing transaction that was included in a block
/// with a success code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub transaction_hash: String,
    pub height: i64,
    pub gas_used: u64,
    pub gas_wanted: u64,
    pub raw_events: Vec<Event>,
}

impl TransactionResult {
    /// First value of `key` on the first event of type `kind`.
    pub fn find_attribute(&self, kind: &str, key: &str) -> Option<&str> {
        self.raw_events
            .iter()
            .filter(|e| e.kind == kind)
            .find_map(|e| e.attribute(key))
    }
}

/// Result of `MsgStoreCode`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub code_id: u64,
    pub transaction: TransactionResult,
}

/// Result of `MsgInstantiateContract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstantiateResult {
    pub contract_address: String,
    pub transaction: TransactionResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: &str, attrs: &[(&str, &str)]) -> Event {
        Event {
            kind: kind.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| EventAttribute {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_find_attribute_matches_event_type() {
        let result = TransactionResult {
            transaction_hash: "AA".to_string(),
            height: 10,
            gas_used: 90,
            gas_wanted: 100,
            raw_events: vec![
                event("message", &[("code_id", "1")]),
                event("store_code", &[("code_checksum", "ff"), ("code_id", "42")]),
            ],
        };
        assert_eq!(result.find_attribute("store_code", "code_id"), Some("42"));
        assert_eq!(result.find_attribute("instantiate", "_contract_address"), None);
    }

    #[test]
    fn test_zero_balance() {
        let balance = Balance::zero("orai");
        assert_eq!(balance.amount, Uint128::zero());
        assert_eq!(serde_json::to_value(&balance).unwrap()["amount"], "0");
    }
}
