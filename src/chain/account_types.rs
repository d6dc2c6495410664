/// Polymorphic account decoding for the Cosmos SDK auth module
///
/// `QueryAccountResponse.account` is a `google.protobuf.Any`; the concrete
/// message depends on the account kind. Only the embedded `BaseAccount` is
/// needed to sign (account number + sequence).

use prost::Message;

use crate::chain::error::{ChainError, Result};
use crate::chain::proto::{
    cosmos::auth::v1beta1::BaseAccount,
    cosmos::vesting::v1beta1::{
        BaseVestingAccount, ContinuousVestingAccount, DelayedVestingAccount,
        PeriodicVestingAccount, PermanentLockedAccount,
    },
};

#[derive(Debug, Clone)]
pub enum ChainAccount {
    Base(BaseAccount),

    BaseVesting(BaseVestingAccount),
    ContinuousVesting(ContinuousVestingAccount),
    DelayedVesting(DelayedVestingAccount),
    PeriodicVesting(PeriodicVestingAccount),
    PermanentLocked(PermanentLockedAccount),

    // Forward compatibility for unknown account types
    Unsupported { type_url: String },
}

/// Signing metadata of an on-chain account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: String,
    pub sequence: u64,
    pub account_number: u64,
}

impl AccountInfo {
    /// Metadata for an address the chain has never seen
    pub fn new_account(address: &str) -> Self {
        Self {
            address: address.to_string(),
            ..Default::default()
        }
    }
}

impl From<&BaseAccount> for AccountInfo {
    fn from(base: &BaseAccount) -> Self {
        Self {
            address: base.address.clone(),
            sequence: base.sequence,
            account_number: base.account_number,
        }
    }
}

fn decode<M: Message + Default>(name: &str, value: &[u8]) -> Result<M> {
    M::decode(value).map_err(|e| ChainError::QueryError {
        operation: "account",
        message: format!("failed to decode {}: {}", name, e),
    })
}

impl ChainAccount {
    /// Decode an `Any`-wrapped account based on its type URL
    pub fn decode_any(type_url: &str, value: &[u8]) -> Result<Self> {
        let account = match type_url {
            "/cosmos.auth.v1beta1.BaseAccount" => ChainAccount::Base(decode("BaseAccount", value)?),
            "/cosmos.vesting.v1beta1.BaseVestingAccount" => {
                ChainAccount::BaseVesting(decode("BaseVestingAccount", value)?)
            }
            "/cosmos.vesting.v1beta1.ContinuousVestingAccount" => {
                ChainAccount::ContinuousVesting(decode("ContinuousVestingAccount", value)?)
            }
            "/cosmos.vesting.v1beta1.DelayedVestingAccount" => {
                ChainAccount::DelayedVesting(decode("DelayedVestingAccount", value)?)
            }
            "/cosmos.vesting.v1beta1.PeriodicVestingAccount" => {
                ChainAccount::PeriodicVesting(decode("PeriodicVestingAccount", value)?)
            }
            "/cosmos.vesting.v1beta1.PermanentLockedAccount" => {
                ChainAccount::PermanentLocked(decode("PermanentLockedAccount", value)?)
            }
            unsupported_type => {
                log::warn!("Encountered unsupported account type: {}", unsupported_type);
                ChainAccount::Unsupported {
                    type_url: unsupported_type.to_string(),
                }
            }
        };

        Ok(account)
    }

    /// Extract account number and sequence, if the variant carries them
    pub fn account_info(&self) -> Option<AccountInfo> {
        let base = match self {
            ChainAccount::Base(acc) => Some(acc),
            ChainAccount::BaseVesting(acc) => acc.base_account.as_ref(),
            ChainAccount::ContinuousVesting(acc) => vesting_base(&acc.base_vesting_account),
            ChainAccount::DelayedVesting(acc) => vesting_base(&acc.base_vesting_account),
            ChainAccount::PeriodicVesting(acc) => vesting_base(&acc.base_vesting_account),
            ChainAccount::PermanentLocked(acc) => vesting_base(&acc.base_vesting_account),
            ChainAccount::Unsupported { .. } => None,
        };
        base.map(AccountInfo::from)
    }

    /// Account type name for logging
    pub fn account_type(&self) -> &'static str {
        match self {
            ChainAccount::Base(_) => "BaseAccount",
            ChainAccount::BaseVesting(_) => "BaseVestingAccount",
            ChainAccount::ContinuousVesting(_) => "ContinuousVestingAccount",
            ChainAccount::DelayedVesting(_) => "DelayedVestingAccount",
            ChainAccount::PeriodicVesting(_) => "PeriodicVestingAccount",
            ChainAccount::PermanentLocked(_) => "PermanentLockedAccount",
            ChainAccount::Unsupported { .. } => "UnsupportedAccount",
        }
    }
}

fn vesting_base(bva: &Option<BaseVestingAccount>) -> Option<&BaseAccount> {
    bva.as_ref().and_then(|v| v.base_account.as_ref())
}
