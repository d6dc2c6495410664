/// Typed façade over `ChainClient` bound to one lottery-operations contract

use std::sync::Arc;

use cosmwasm_std::Uint128;
use serde::de::DeserializeOwned;

use crate::chain::client::ChainClient;
use crate::chain::error::{ChainError, Result};
use crate::chain::gas::GasMode;
use crate::chain::messages::{
    BuyTicketMsg, ConfigResponse, ContractMessage, InstantiateMsg, QueryMsg, TicketPriceResponse,
};
use crate::chain::proto::Coin;
use crate::chain::types::{InstantiateResult, TransactionResult, UploadResult};
use crate::chain::wallet::{validate_address, Signer};

#[derive(Clone)]
pub struct ContractSession {
    client: Arc<ChainClient>,
    signer: Arc<Signer>,
    contract_address: String,
    gas: GasMode,
}

impl ContractSession {
    pub fn new(client: Arc<ChainClient>, signer: Arc<Signer>, contract_address: &str) -> Result<Self> {
        validate_address(contract_address)
            .map_err(|e| ChainError::InvalidArgument(format!("contract address: {}", e)))?;

        let gas = client.default_gas_mode();
        Ok(Self {
            client,
            signer,
            contract_address: contract_address.to_string(),
            gas,
        })
    }

    /// Gas mode used by every transaction of this session
    pub fn with_gas(mut self, gas: GasMode) -> Self {
        self.gas = gas;
        self
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn client(&self) -> &ChainClient {
        &self.client
    }

    /// Upload contract code as `signer`
    pub async fn upload_code(
        client: &ChainClient,
        signer: &Signer,
        wasm_byte_code: Vec<u8>,
        gas: GasMode,
    ) -> Result<UploadResult> {
        client.upload_code(signer, wasm_byte_code, gas).await
    }

    /// Instantiate `code_id` and return a session bound to the new contract
    pub async fn instantiate(
        client: Arc<ChainClient>,
        signer: Arc<Signer>,
        code_id: u64,
        msg: &InstantiateMsg,
        label: &str,
        admin: Option<&str>,
        gas: GasMode,
    ) -> Result<(Self, InstantiateResult)> {
        let result = client
            .instantiate_contract(&signer, code_id, msg, label, admin, vec![], gas)
            .await?;

        let session = Self::new(client, signer, &result.contract_address)?.with_gas(gas);
        Ok((session, result))
    }

    /// Smart query decoded into `R`
    pub async fn query<M, R>(&self, msg: &M) -> Result<R>
    where
        M: ContractMessage,
        R: DeserializeOwned,
    {
        let value = self
            .client
            .query_contract_smart(&self.contract_address, msg)
            .await?;

        serde_json::from_value(value).map_err(|e| {
            ChainError::Encoding(format!(
                "unexpected {} response from {}: {}",
                msg.operation(),
                self.contract_address,
                e
            ))
        })
    }

    /// Signed execute; resolves once the transaction is in a block
    pub async fn execute<M: ContractMessage>(&self, msg: &M, funds: Vec<Coin>) -> Result<TransactionResult> {
        self.client
            .broadcast_tx(&self.signer, &self.contract_address, msg, funds, self.gas)
            .await
    }

    pub async fn get_ticket_price(&self) -> Result<TicketPriceResponse> {
        self.query(&QueryMsg::GetTicketPrice {}).await
    }

    pub async fn get_config(&self) -> Result<ConfigResponse> {
        self.query(&QueryMsg::Config {}).await
    }

    pub async fn buy_ticket(&self, amount: Uint128) -> Result<TransactionResult> {
        self.execute(&BuyTicketMsg::new(amount).build_msg(), vec![])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::client::ClientConfig;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn session_parts() -> (Arc<ChainClient>, Arc<Signer>) {
        let client = Arc::new(ChainClient::new(ClientConfig::default()));
        let signer = Arc::new(Signer::from_mnemonic(TEST_MNEMONIC, "orai").unwrap());
        (client, signer)
    }

    #[test]
    fn test_session_rejects_malformed_contract() {
        let (client, signer) = session_parts();
        assert!(matches!(
            ContractSession::new(client, signer, "orai1notbech32"),
            Err(ChainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_session_gas_mode() {
        let (client, signer) = session_parts();
        let contract = signer.address().to_string();
        let session = ContractSession::new(client, signer, &contract).unwrap();
        assert_eq!(session.gas, GasMode::Auto { multiplier: 1.3 });

        let session = session.with_gas(GasMode::Explicit(300_000));
        assert_eq!(session.gas, GasMode::Explicit(300_000));
        assert_eq!(session.contract_address(), contract);
    }

    #[tokio::test]
    async fn test_operations_before_connect() {
        let (client, signer) = session_parts();
        let contract = signer.address().to_string();
        let session = ContractSession::new(client, signer, &contract).unwrap();

        assert!(matches!(session.get_ticket_price().await, Err(ChainError::NotConnected { .. })));
        assert!(matches!(session.get_config().await, Err(ChainError::NotConnected { .. })));
        assert!(matches!(
            session.buy_ticket(Uint128::zero()).await,
            Err(ChainError::NotConnected { .. })
        ));
    }

    #[tokio::test]
    async fn test_instantiate_before_connect() {
        let (client, signer) = session_parts();
        let owner = signer.address().to_string();
        let msg = InstantiateMsg::new(&owner, &owner, &owner).unwrap();

        let result = ContractSession::instantiate(client, signer, 1, &msg, "lottery", None, GasMode::auto()).await;
        assert!(matches!(result, Err(ChainError::NotConnected { .. })));
    }
}
