//! Error taxonomy for the chain layer

use thiserror::Error;

/// Errors surfaced by the signer, the chain client and contract sessions.
///
/// Every variant carries enough context (operation, contract, node text) for a
/// caller to tell a network fault apart from a contract rejecting a message.
#[derive(Error, Debug)]
pub enum ChainError {
    /// The seed phrase failed BIP39 word-list or checksum validation.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Key material could not be used to produce a signature.
    #[error("Signing failed: {0}")]
    SigningError(String),

    /// The node could not be reached or the handshake failed.
    #[error("Connection to {endpoint} failed: {message}")]
    ConnectionError { endpoint: String, message: String },

    /// A query or broadcast was attempted before `connect()`.
    #[error("Client not connected, cannot run {operation}. Call connect() first.")]
    NotConnected { operation: &'static str },

    /// The transaction was accepted but not seen in a block in time.
    /// It may still be included later; poll by hash.
    #[error("Transaction {tx_hash} not included after {waited_secs}s")]
    BroadcastTimeout { tx_hash: String, waited_secs: u64 },

    /// A read-only chain query (balance, account, tx lookup) failed.
    #[error("{operation} query failed: {message}")]
    QueryError { operation: &'static str, message: String },

    /// The contract rejected a smart query.
    #[error("Contract {contract} rejected query {operation}: {message}")]
    ContractQueryError {
        operation: String,
        contract: String,
        message: String,
    },

    /// The fee (plus attached funds) exceeds the sender's balance.
    #[error("Insufficient funds: need {required}{denom}, have {available}{denom}")]
    InsufficientFunds {
        denom: String,
        required: u128,
        available: u128,
    },

    /// The chain reported a failed execution (simulation, CheckTx or in-block).
    #[error("{operation} on {contract} failed (code {code}{}): {log}", tx_suffix(.tx_hash))]
    ContractExecutionError {
        operation: String,
        contract: String,
        tx_hash: Option<String>,
        code: u32,
        log: String,
    },

    /// A structurally invalid argument (address, label, empty payload).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid gas price '{0}'")]
    InvalidGasPrice(String),

    /// Local encoding/decoding of a message or response failed.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

fn tx_suffix(tx_hash: &Option<String>) -> String {
    tx_hash
        .as_deref()
        .map(|h| format!(", tx {}", h))
        .unwrap_or_default()
}

impl From<prost::EncodeError> for ChainError {
    fn from(e: prost::EncodeError) -> Self {
        ChainError::Encoding(e.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        ChainError::Encoding(e.to_string())
    }
}

/// Result alias for chain operations.
pub type Result<T, E = ChainError> = std::result::Result<T, E>;
