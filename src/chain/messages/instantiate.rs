use cosmwasm_std::Coin;
use serde::{Deserialize, Serialize};

use crate::chain::error::{ChainError, Result};
use crate::chain::wallet::validate_address;

/// Instantiate message of the lottery-operations contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    pub owner: String,
    pub lottery_contract: String,
    pub oraiswap_router: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<Coin>,
    /// Round length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_duration: Option<u64>,
}

impl InstantiateMsg {
    /// Build and structurally check the addresses
    pub fn new(owner: &str, lottery_contract: &str, oraiswap_router: &str) -> Result<Self> {
        for (field, addr) in [
            ("owner", owner),
            ("lottery_contract", lottery_contract),
            ("oraiswap_router", oraiswap_router),
        ] {
            validate_address(addr).map_err(|e| ChainError::InvalidArgument(format!("{}: {}", field, e)))?;
        }

        Ok(Self {
            owner: owner.to_string(),
            lottery_contract: lottery_contract.to_string(),
            oraiswap_router: oraiswap_router.to_string(),
            ticket_price: None,
            round_duration: None,
        })
    }

    pub fn with_ticket_price(mut self, price: Coin) -> Self {
        self.ticket_price = Some(price);
        self
    }

    pub fn with_round_duration(mut self, seconds: u64) -> Self {
        self.round_duration = Some(seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::wallet::derive_account;
    use cosmwasm_std::Uint128;
    use serde_json::json;

    fn addr() -> String {
        derive_account(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
            "orai",
        )
        .unwrap()
        .address
    }

    #[test]
    fn test_instantiate_json_shape() {
        let a = addr();
        let msg = InstantiateMsg::new(&a, &a, &a)
            .unwrap()
            .with_ticket_price(Coin { denom: "USDT".to_string(), amount: Uint128::zero() })
            .with_round_duration(600);

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "owner": a,
                "lottery_contract": a,
                "oraiswap_router": a,
                "ticket_price": {"denom": "USDT", "amount": "0"},
                "round_duration": 600
            })
        );
    }

    #[test]
    fn test_optional_fields_omitted() {
        let a = addr();
        let value = serde_json::to_value(InstantiateMsg::new(&a, &a, &a).unwrap()).unwrap();
        assert!(value.get("ticket_price").is_none());
        assert!(value.get("round_duration").is_none());
    }

    #[test]
    fn test_bad_address_rejected() {
        let a = addr();
        match InstantiateMsg::new(&a, "not-an-address", &a) {
            Err(ChainError::InvalidArgument(msg)) => assert!(msg.starts_with("lottery_contract")),
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }
}
