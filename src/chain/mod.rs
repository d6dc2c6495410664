pub mod account_types;
pub mod client;
pub mod error;
pub mod gas;
pub mod messages;
pub mod proto;
pub mod session;
pub mod tx_builder;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, ClientConfig};
pub use error::{ChainError, Result};
pub use gas::{GasMode, GasPrice};
pub use messages::{BuyTicketMsg, ConfigResponse, ContractMessage, ExecuteMsg, InstantiateMsg, QueryMsg, TicketPriceResponse};
pub use session::ContractSession;
pub use types::{Account, Balance, Event, InstantiateResult, Signature, TransactionResult, UploadResult};
pub use wallet::{derive_account, Signer};
