/// Gas pricing and fee arithmetic

use std::fmt;
use std::str::FromStr;

use cosmwasm_std::{Decimal, Uint128};

use crate::chain::error::{ChainError, Result};
use crate::chain::proto::Coin;

/// Default safety multiplier applied to simulated gas
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.3;

/// Fee-per-gas-unit, e.g. `0.001orai`.
/// Fixed at client construction and never re-queried from the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub amount: Decimal,
    pub denom: String,
}

impl GasPrice {
    pub fn new(amount: Decimal, denom: &str) -> Self {
        Self {
            amount,
            denom: denom.to_string(),
        }
    }

    /// Fee for `gas_limit` units, rounded up to the next whole base unit.
    pub fn fee_amount(&self, gas_limit: u64) -> Result<u128> {
        let scale = 10u128.pow(Decimal::DECIMAL_PLACES);
        let product = self
            .amount
            .atomics()
            .u128()
            .checked_mul(gas_limit as u128)
            .ok_or_else(|| ChainError::InvalidGasPrice(format!("fee overflow for {} gas", gas_limit)))?;

        Ok(product / scale + u128::from(product % scale != 0))
    }

    /// Fee for `gas_limit` units as a single coin.
    pub fn fee(&self, gas_limit: u64) -> Result<Coin> {
        Ok(Coin {
            denom: self.denom.clone(),
            amount: self.fee_amount(gas_limit)?.to_string(),
        })
    }
}

impl FromStr for GasPrice {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split_pos = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| ChainError::InvalidGasPrice(s.to_string()))?;

        let (amount_str, denom) = s.split_at(split_pos);
        if amount_str.is_empty() || !denom.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ChainError::InvalidGasPrice(s.to_string()));
        }

        let amount = Decimal::from_str(amount_str)
            .map_err(|_| ChainError::InvalidGasPrice(s.to_string()))?;

        Ok(Self::new(amount, denom))
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// How a transaction's gas limit is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GasMode {
    /// Simulate against current state, then multiply the gas used.
    Auto { multiplier: f64 },
    /// Use the given gas limit as-is, no simulation.
    Explicit(u64),
}

impl GasMode {
    pub fn auto() -> Self {
        GasMode::Auto {
            multiplier: DEFAULT_GAS_ADJUSTMENT,
        }
    }
}

impl Default for GasMode {
    fn default() -> Self {
        Self::auto()
    }
}

/// A gas multiplier must be finite and at least 1.0.
pub fn validate_gas_adjustment(multiplier: f64) -> Result<f64> {
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(ChainError::InvalidArgument(format!(
            "gas adjustment must be a finite number >= 1.0, got {}",
            multiplier
        )));
    }
    Ok(multiplier)
}

/// Apply the safety multiplier to simulated gas.
pub fn adjusted_gas(gas_used: u64, multiplier: f64) -> u64 {
    (gas_used as f64 * multiplier).ceil() as u64
}

/// Total the sender must hold in `denom`: the fee plus any attached funds
/// of the same denom.
pub fn required_amount(fee: &Coin, funds: &[Coin]) -> Result<u128> {
    let mut total = parse_amount(&fee.amount)?;
    for coin in funds.iter().filter(|c| c.denom == fee.denom) {
        total = total
            .checked_add(parse_amount(&coin.amount)?)
            .ok_or_else(|| ChainError::InvalidArgument("attached funds overflow".to_string()))?;
    }
    Ok(total)
}

/// Fail with `InsufficientFunds` when `available` cannot cover `required`.
pub fn ensure_sufficient_funds(denom: &str, required: u128, available: Uint128) -> Result<()> {
    if available.u128() < required {
        return Err(ChainError::InsufficientFunds {
            denom: denom.to_string(),
            required,
            available: available.u128(),
        });
    }
    Ok(())
}

fn parse_amount(amount: &str) -> Result<u128> {
    amount
        .parse::<u128>()
        .map_err(|e| ChainError::InvalidArgument(format!("invalid coin amount '{}': {}", amount, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_price_parsing() {
        let price: GasPrice = "0.001orai".parse().unwrap();
        assert_eq!(price.denom, "orai");
        assert_eq!(price.amount, Decimal::from_str("0.001").unwrap());
        assert_eq!(price.to_string(), "0.001orai");

        let ibc: GasPrice = "0.025ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
            .parse()
            .unwrap();
        assert!(ibc.denom.starts_with("ibc/"));
    }

    #[test]
    fn test_gas_price_rejects_malformed_input() {
        assert!("orai".parse::<GasPrice>().is_err());
        assert!("0.001".parse::<GasPrice>().is_err());
        assert!("1.2.3orai".parse::<GasPrice>().is_err());
        assert!("".parse::<GasPrice>().is_err());
    }

    #[test]
    fn test_fee_rounds_up() {
        let price: GasPrice = "0.001orai".parse().unwrap();
        assert_eq!(price.fee_amount(200_000).unwrap(), 200);
        assert_eq!(price.fee_amount(200_001).unwrap(), 201);
        assert_eq!(price.fee_amount(0).unwrap(), 0);

        let coin = price.fee(150_500).unwrap();
        assert_eq!(coin.denom, "orai");
        assert_eq!(coin.amount, "151");
    }

    #[test]
    fn test_adjusted_gas() {
        assert_eq!(adjusted_gas(100_000, 1.5), 150_000);
        assert_eq!(adjusted_gas(1, 1.3), 2);
    }

    #[test]
    fn test_gas_adjustment_bounds() {
        assert_eq!(validate_gas_adjustment(1.0).unwrap(), 1.0);
        assert_eq!(validate_gas_adjustment(DEFAULT_GAS_ADJUSTMENT).unwrap(), 1.3);
        for bad in [0.0, 0.5, -1.3, f64::NAN, f64::INFINITY] {
            assert!(matches!(validate_gas_adjustment(bad), Err(ChainError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_required_amount_counts_same_denom_funds() {
        let fee = Coin { denom: "orai".to_string(), amount: "200".to_string() };
        let funds = vec![
            Coin { denom: "orai".to_string(), amount: "1000".to_string() },
            Coin { denom: "usdt".to_string(), amount: "5".to_string() },
        ];
        assert_eq!(required_amount(&fee, &funds).unwrap(), 1200);
        assert_eq!(required_amount(&fee, &[]).unwrap(), 200);
    }

    #[test]
    fn test_funds_check() {
        assert!(ensure_sufficient_funds("orai", 200, Uint128::new(200)).is_ok());
        match ensure_sufficient_funds("orai", 201, Uint128::new(200)) {
            Err(ChainError::InsufficientFunds { required, available, .. }) => {
                assert_eq!(required, 201);
                assert_eq!(available, 200);
            }
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
    }
}
