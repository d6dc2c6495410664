/// Responses of the lottery-operations contract's smart queries

use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};

/// Response of `{"get_ticket_price":{}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPriceResponse {
    pub denom: String,
    pub amount: Uint128,
}

/// Response of `{"config":{}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub owner: String,
    pub lottery_contract: String,
    pub oraiswap_router: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_price_response() {
        let price: TicketPriceResponse =
            serde_json::from_str(r#"{"denom":"USDT","amount":"1500000"}"#).unwrap();
        assert_eq!(price.denom, "USDT");
        assert_eq!(price.amount, Uint128::new(1_500_000));
    }

    #[test]
    fn test_config_response() {
        let config: ConfigResponse = serde_json::from_str(
            r#"{"owner":"orai1owner","lottery_contract":"orai1lottery","oraiswap_router":"orai1router"}"#,
        )
        .unwrap();
        assert_eq!(config.lottery_contract, "orai1lottery");
    }
}
