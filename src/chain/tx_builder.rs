/// Transaction builder using the Cosmos SDK proto types
/// Produces SIGN_MODE_DIRECT transactions for the CosmWasm messages

use prost::Message;
use sha2::{Digest, Sha256};

use crate::chain::error::{ChainError, Result};
use crate::chain::proto::{
    mode_info, Any, AuthInfo, Coin, Fee, ModeInfo, MsgExecuteContract, MsgInstantiateContract,
    MsgStoreCode, Secp256k1PubKey, SignDoc, SignerInfo, TxBody, TxRaw,
    MSG_EXECUTE_CONTRACT_TYPE_URL, MSG_INSTANTIATE_CONTRACT_TYPE_URL, MSG_STORE_CODE_TYPE_URL,
    SECP256K1_PUBKEY_TYPE_URL,
};
use crate::chain::wallet::Signer;

/// SIGN_MODE_DIRECT = 1
const SIGN_MODE_DIRECT: i32 = 1;

/// Builds and signs transactions for one signer at one sequence number
pub struct TxBuilder<'a> {
    chain_id: String,
    account_number: u64,
    sequence: u64,
    signer: &'a Signer,
}

impl<'a> TxBuilder<'a> {
    pub fn new(chain_id: &str, account_number: u64, sequence: u64, signer: &'a Signer) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            account_number,
            sequence,
            signer,
        }
    }

    /// Unsigned copy for gas simulation: zero fee, empty signature
    pub fn build_simulation_tx(&self, messages: &[Any]) -> Result<Vec<u8>> {
        let (body_bytes, auth_info_bytes) = self.encode_body_and_auth(messages, Fee::default())?;
        let tx_raw = TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures: vec![Vec::new()],
        };
        Ok(tx_raw.encode_to_vec())
    }

    /// Fully signed transaction ready for broadcast
    pub fn build_signed_tx(&self, messages: &[Any], fee: Fee) -> Result<Vec<u8>> {
        let (body_bytes, auth_info_bytes) = self.encode_body_and_auth(messages, fee)?;

        let sign_doc = SignDoc {
            body_bytes: body_bytes.clone(),
            auth_info_bytes: auth_info_bytes.clone(),
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
        };
        let signature = self
            .signer
            .sign(self.signer.account(), &sign_doc.encode_to_vec())?;

        let tx_raw = TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures: vec![signature.to_vec()],
        };
        Ok(tx_raw.encode_to_vec())
    }

    fn encode_body_and_auth(&self, messages: &[Any], fee: Fee) -> Result<(Vec<u8>, Vec<u8>)> {
        if messages.is_empty() {
            return Err(ChainError::InvalidArgument("transaction has no messages".to_string()));
        }

        let tx_body = TxBody {
            messages: messages.to_vec(),
            ..Default::default()
        };

        let pub_key_any = Any {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            value: Secp256k1PubKey {
                key: self.signer.account().public_key.clone(),
            }
            .encode_to_vec(),
        };

        let signer_info = SignerInfo {
            public_key: Some(pub_key_any),
            mode_info: Some(ModeInfo {
                sum: Some(mode_info::Sum::Single(mode_info::Single {
                    mode: SIGN_MODE_DIRECT,
                })),
            }),
            sequence: self.sequence,
        };

        let auth_info = AuthInfo {
            signer_infos: vec![signer_info],
            fee: Some(fee),
            ..Default::default()
        };

        Ok((tx_body.encode_to_vec(), auth_info.encode_to_vec()))
    }
}

/// Fee with a single coin and gas limit
pub fn fee(amount: Coin, gas_limit: u64) -> Fee {
    Fee {
        amount: vec![amount],
        gas_limit,
        ..Default::default()
    }
}

/// Transaction hash as reported by the node: upper-hex SHA-256 of the raw bytes
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}

fn sorted(mut funds: Vec<Coin>) -> Vec<Coin> {
    funds.sort_by(|a, b| a.denom.cmp(&b.denom));
    funds
}

pub fn store_code_msg(sender: &str, wasm_byte_code: Vec<u8>) -> Result<Any> {
    if wasm_byte_code.is_empty() {
        return Err(ChainError::InvalidArgument("wasm byte code is empty".to_string()));
    }
    let msg = MsgStoreCode {
        sender: sender.to_string(),
        wasm_byte_code,
        ..Default::default()
    };
    Ok(Any {
        type_url: MSG_STORE_CODE_TYPE_URL.to_string(),
        value: msg.encode_to_vec(),
    })
}

pub fn instantiate_contract_msg(
    sender: &str,
    admin: Option<&str>,
    code_id: u64,
    label: &str,
    msg: Vec<u8>,
    funds: Vec<Coin>,
) -> Result<Any> {
    if label.trim().is_empty() {
        return Err(ChainError::InvalidArgument("instantiate label must not be empty".to_string()));
    }
    let msg = MsgInstantiateContract {
        sender: sender.to_string(),
        admin: admin.unwrap_or_default().to_string(),
        code_id,
        label: label.to_string(),
        msg,
        funds: sorted(funds),
    };
    Ok(Any {
        type_url: MSG_INSTANTIATE_CONTRACT_TYPE_URL.to_string(),
        value: msg.encode_to_vec(),
    })
}

pub fn execute_contract_msg(sender: &str, contract: &str, msg: Vec<u8>, funds: Vec<Coin>) -> Any {
    let msg = MsgExecuteContract {
        sender: sender.to_string(),
        contract: contract.to_string(),
        msg,
        funds: sorted(funds),
    };
    Any {
        type_url: MSG_EXECUTE_CONTRACT_TYPE_URL.to_string(),
        value: msg.encode_to_vec(),
    }
}
