use std::str::FromStr;

use cosmwasm_std::Uint128;

use super::ExecuteMsg;
use crate::chain::error::{ChainError, Result};

/// Message for buying lottery tickets through the operations contract
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BuyTicketMsg {
    /// Offered amount in base units; the contract prices the ticket
    pub amount: Uint128,
}

impl BuyTicketMsg {
    pub fn new(amount: Uint128) -> Self {
        Self { amount }
    }

    /// Parse a decimal-string amount such as `"1000000"`
    pub fn parse(amount: &str) -> Result<Self> {
        let amount = Uint128::from_str(amount.trim())
            .map_err(|e| ChainError::InvalidArgument(format!("invalid ticket amount '{}': {}", amount, e)))?;
        Ok(Self::new(amount))
    }

    pub fn build_msg(&self) -> ExecuteMsg {
        ExecuteMsg::BuyTicket { amount: self.amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::messages::ContractMessage;

    #[test]
    fn test_parse_amount() {
        assert_eq!(BuyTicketMsg::parse("0").unwrap().amount, Uint128::zero());
        assert_eq!(BuyTicketMsg::parse(" 1000000 ").unwrap().amount, Uint128::new(1_000_000));
        assert!(matches!(BuyTicketMsg::parse("-1"), Err(ChainError::InvalidArgument(_))));
        assert!(BuyTicketMsg::parse("1.5").is_err());
    }

    #[test]
    fn test_message_serialization() {
        let json = String::from_utf8(BuyTicketMsg::new(Uint128::new(42)).build_msg().to_json_bytes().unwrap()).unwrap();
        assert!(json.contains("buy_ticket"));
        assert!(json.contains(r#""amount":"42""#));
    }
}
