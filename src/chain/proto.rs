/// Cosmos SDK / CosmWasm protobuf types used by the chain layer
/// Generated types and gRPC clients come from `cosmos-sdk-proto`

pub use cosmos_sdk_proto::Any;
pub use cosmos_sdk_proto::cosmos;
pub use cosmos_sdk_proto::cosmwasm;

// Re-export commonly used types for convenience
pub use cosmos::base::v1beta1::Coin;
pub use cosmos::tx::v1beta1::{
    mode_info, AuthInfo, BroadcastMode, BroadcastTxRequest, Fee, GetTxRequest, ModeInfo,
    SignDoc, SignerInfo, SimulateRequest, TxBody, TxRaw,
    service_client::ServiceClient as TxServiceClient,
};
pub use cosmos::base::abci::v1beta1::TxResponse;
pub use cosmos::auth::v1beta1::{
    BaseAccount, QueryAccountRequest,
    query_client::QueryClient as AuthQueryClient,
};
pub use cosmos::bank::v1beta1::{
    QueryBalanceRequest,
    query_client::QueryClient as BankQueryClient,
};
pub use cosmos::crypto::secp256k1::PubKey as Secp256k1PubKey;
pub use cosmwasm::wasm::v1::{
    MsgExecuteContract, MsgInstantiateContract, MsgStoreCode, QuerySmartContractStateRequest,
    query_client::QueryClient as WasmQueryClient,
};

pub const MSG_STORE_CODE_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgStoreCode";
pub const MSG_INSTANTIATE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
pub const MSG_EXECUTE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";
