use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use cosmwasm_std::Uint128;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Status};

use crate::chain::account_types::{AccountInfo, ChainAccount};
use crate::chain::error::{ChainError, Result};
use crate::chain::gas::{
    adjusted_gas, ensure_sufficient_funds, required_amount, validate_gas_adjustment, GasMode, GasPrice,
    DEFAULT_GAS_ADJUSTMENT,
};
use crate::chain::messages::ContractMessage;
use crate::chain::proto::{
    Any, AuthQueryClient, BankQueryClient, BroadcastMode, BroadcastTxRequest, Coin, GetTxRequest,
    QueryAccountRequest, QueryBalanceRequest, QuerySmartContractStateRequest, SimulateRequest,
    TxResponse, TxServiceClient, WasmQueryClient,
};
use crate::chain::tx_builder::{self, TxBuilder};
use crate::chain::types::{Balance, Event, EventAttribute, InstantiateResult, TransactionResult, UploadResult};
use crate::chain::wallet::{validate_address, Signer};

/// Configuration for the gRPC chain client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// gRPC endpoint URL (e.g., "https://grpc.orai.io")
    pub grpc_endpoint: String,
    /// Chain ID (e.g., "Oraichain")
    pub chain_id: String,
    /// Price used for every fee computed by this client
    pub gas_price: GasPrice,
    /// Multiplier applied to simulated gas in auto mode
    pub gas_adjustment: f64,
    /// Connection timeout in seconds
    pub connection_timeout: u64,
    /// Request timeout in seconds
    pub request_timeout: u64,
    /// How long to wait for a broadcast transaction to land in a block, in seconds
    pub broadcast_timeout: u64,
    /// Interval between inclusion polls, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            grpc_endpoint: "https://grpc.orai.io".to_string(),
            chain_id: "Oraichain".to_string(),
            gas_price: GasPrice::new(cosmwasm_std::Decimal::permille(1), "orai"),
            gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
            connection_timeout: 10,
            request_timeout: 30,
            broadcast_timeout: 60,
            poll_interval_ms: 1000,
        }
    }
}

/// Who a failed transaction or query was aimed at, for error reporting
#[derive(Debug, Clone)]
struct TxContext {
    operation: String,
    contract: String,
}

impl TxContext {
    fn new(operation: &str, contract: &str) -> Self {
        Self {
            operation: operation.to_string(),
            contract: contract.to_string(),
        }
    }
}

/// gRPC client for a Cosmos SDK chain with the CosmWasm module
///
/// Queries take `&self` and may run in parallel. Signed submissions are
/// serialized per sender address so two broadcasts never race for the same
/// sequence number.
pub struct ChainClient {
    config: ClientConfig,
    channel: RwLock<Option<Channel>>,
    sequence_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ChainClient {
    /// Create a disconnected client
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            channel: RwLock::new(None),
            sequence_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a client and connect it in one step
    pub async fn connect_with(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config);
        client.connect().await?;
        Ok(client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn gas_price(&self) -> &GasPrice {
        &self.config.gas_price
    }

    /// Auto gas mode with the configured multiplier
    pub fn default_gas_mode(&self) -> GasMode {
        GasMode::Auto {
            multiplier: self.config.gas_adjustment,
        }
    }

    /// Connect to the gRPC endpoint. Calling it again replaces the session.
    pub async fn connect(&self) -> Result<()> {
        let endpoint_url = self.config.grpc_endpoint.clone();
        log::info!("Connecting to {} ({})", endpoint_url, self.config.chain_id);

        let connection_error = |message: String| ChainError::ConnectionError {
            endpoint: endpoint_url.clone(),
            message,
        };

        let mut endpoint = Endpoint::from_shared(endpoint_url.clone())
            .map_err(|e| connection_error(e.to_string()))?
            .timeout(Duration::from_secs(self.config.request_timeout))
            .connect_timeout(Duration::from_secs(self.config.connection_timeout));

        if endpoint_url.starts_with("https://") {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new())
                .map_err(|e| connection_error(e.to_string()))?;
        }

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| connection_error(e.to_string()))?;

        *self.channel.write().unwrap_or_else(PoisonError::into_inner) = Some(channel);

        log::info!("Connected to {}", endpoint_url);
        Ok(())
    }

    /// Release the network session. No-op when already disconnected.
    pub fn disconnect(&self) {
        let previous = self
            .channel
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            log::info!("Disconnected from {}", self.config.grpc_endpoint);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.channel
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn channel(&self, operation: &'static str) -> Result<Channel> {
        self.channel
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ChainError::NotConnected { operation })
    }

    fn connection_error(&self, status: &Status) -> ChainError {
        ChainError::ConnectionError {
            endpoint: self.config.grpc_endpoint.clone(),
            message: status.message().to_string(),
        }
    }

    /// Lock guarding the sequence number of `address`
    fn sequence_lock(&self, address: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.sequence_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(address.to_string())
            .or_default()
            .clone()
    }

    /// Bank balance of `denom`; zero when the address holds none
    pub async fn get_balance(&self, address: &str, denom: &str) -> Result<Balance> {
        let channel = self.channel("balance")?;
        validate_address(address).map_err(|message| ChainError::QueryError {
            operation: "balance",
            message,
        })?;

        let mut client = BankQueryClient::new(channel);
        let response = client
            .balance(QueryBalanceRequest {
                address: address.to_string(),
                denom: denom.to_string(),
            })
            .await
            .map_err(|e| ChainError::QueryError {
                operation: "balance",
                message: e.message().to_string(),
            })?;

        let Some(coin) = response.into_inner().balance else {
            return Ok(Balance::zero(denom));
        };
        if coin.amount.is_empty() {
            return Ok(Balance::zero(denom));
        }

        let amount = coin.amount.parse::<u128>().map_err(|e| ChainError::QueryError {
            operation: "balance",
            message: format!("unparseable amount '{}': {}", coin.amount, e),
        })?;

        Ok(Balance {
            denom: denom.to_string(),
            amount: Uint128::new(amount),
        })
    }

    /// Account number and sequence; defaults for accounts the chain has not seen
    pub async fn query_account(&self, address: &str) -> Result<AccountInfo> {
        let channel = self.channel("account")?;
        let mut client = AuthQueryClient::new(channel);

        let response = match client
            .account(QueryAccountRequest {
                address: address.to_string(),
            })
            .await
        {
            Ok(response) => response.into_inner(),
            Err(status) if status.code() == Code::NotFound => {
                log::info!("Account {} not found on chain, using sequence 0", address);
                return Ok(AccountInfo::new_account(address));
            }
            Err(status) if is_connection_failure(&status) => return Err(self.connection_error(&status)),
            Err(status) => {
                return Err(ChainError::QueryError {
                    operation: "account",
                    message: status.message().to_string(),
                })
            }
        };

        let account_any = response.account.ok_or_else(|| ChainError::QueryError {
            operation: "account",
            message: format!("no account returned for {}", address),
        })?;

        log::debug!("Decoding account with type_url: {}", account_any.type_url);
        let account = ChainAccount::decode_any(&account_any.type_url, &account_any.value)?;

        match account.account_info() {
            Some(info) => Ok(info),
            None => {
                log::warn!(
                    "Account type {} doesn't provide extractable account info",
                    account.account_type()
                );
                Ok(AccountInfo::new_account(address))
            }
        }
    }

    /// Read-only smart query; no signature, no gas
    pub async fn query_contract_smart<M: ContractMessage>(&self, contract_address: &str, msg: &M) -> Result<Value> {
        let channel = self.channel("query_contract_smart")?;
        let ctx = TxContext::new(&msg.operation(), contract_address);
        let query_data = msg.to_json_bytes()?;

        log::debug!(
            "Querying contract {} with message: {}",
            contract_address,
            String::from_utf8_lossy(&query_data)
        );

        let mut client = WasmQueryClient::new(channel);
        let response = client
            .smart_contract_state(QuerySmartContractStateRequest {
                address: contract_address.to_string(),
                query_data,
            })
            .await
            .map_err(|status| self.classify_query_status(&status, &ctx))?;

        let data = response.into_inner().data;
        serde_json::from_slice::<Value>(&data).map_err(|e| {
            ChainError::Encoding(format!(
                "{} on {} returned non-JSON data: {}",
                ctx.operation, ctx.contract, e
            ))
        })
    }

    fn classify_query_status(&self, status: &Status, ctx: &TxContext) -> ChainError {
        if is_connection_failure(status) {
            return self.connection_error(status);
        }
        ChainError::ContractQueryError {
            operation: ctx.operation.clone(),
            contract: ctx.contract.clone(),
            message: status.message().to_string(),
        }
    }

    /// Simulate a transaction and return the gas used
    async fn simulate(&self, tx_bytes: Vec<u8>, ctx: &TxContext) -> Result<u64> {
        let channel = self.channel("simulate")?;
        let mut client = TxServiceClient::new(channel);

        let response = client
            .simulate(SimulateRequest {
                tx_bytes,
                ..Default::default()
            })
            .await
            .map_err(|status| self.classify_execution_status(&status, ctx))?;

        let gas_info = response.into_inner().gas_info.ok_or_else(|| {
            ChainError::Encoding("no gas info in simulation response".to_string())
        })?;

        Ok(gas_info.gas_used)
    }

    fn classify_execution_status(&self, status: &Status, ctx: &TxContext) -> ChainError {
        if is_connection_failure(status) {
            return self.connection_error(status);
        }
        ChainError::ContractExecutionError {
            operation: ctx.operation.clone(),
            contract: ctx.contract.clone(),
            tx_hash: None,
            code: status.code() as i32 as u32,
            log: status.message().to_string(),
        }
    }

    /// Submit in SYNC mode; fails if CheckTx rejects the transaction
    async fn submit(&self, tx_bytes: Vec<u8>, tx_hash: &str, ctx: &TxContext) -> Result<String> {
        let channel = self.channel("broadcast")?;
        let mut client = TxServiceClient::new(channel);

        log::info!("Broadcasting {} ({} bytes, hash {})", ctx.operation, tx_bytes.len(), tx_hash);
        let response = client
            .broadcast_tx(BroadcastTxRequest {
                tx_bytes,
                mode: BroadcastMode::Sync as i32,
            })
            .await
            .map_err(|status| self.classify_execution_status(&status, ctx))?;

        let tx_response = response.into_inner().tx_response.ok_or_else(|| {
            ChainError::Encoding("no tx response in broadcast response".to_string())
        })?;

        if tx_response.code != 0 {
            log::warn!("CheckTx rejected {}: {}", tx_hash, tx_response.raw_log);
            return Err(ChainError::ContractExecutionError {
                operation: ctx.operation.clone(),
                contract: ctx.contract.clone(),
                tx_hash: Some(tx_hash.to_string()),
                code: tx_response.code,
                log: tx_response.raw_log,
            });
        }

        if !tx_response.txhash.is_empty() && !tx_response.txhash.eq_ignore_ascii_case(tx_hash) {
            log::warn!("Node reported hash {} for local hash {}", tx_response.txhash, tx_hash);
            return Ok(tx_response.txhash);
        }
        Ok(tx_hash.to_string())
    }

    async fn lookup_tx(&self, tx_hash: &str) -> Result<Option<TxResponse>> {
        let channel = self.channel("get_tx")?;
        let mut client = TxServiceClient::new(channel);

        match client
            .get_tx(GetTxRequest {
                hash: tx_hash.to_string(),
            })
            .await
        {
            Ok(response) => Ok(response.into_inner().tx_response),
            Err(status) if is_not_found(&status) => Ok(None),
            Err(status) if is_connection_failure(&status) => Err(self.connection_error(&status)),
            Err(status) => Err(ChainError::QueryError {
                operation: "get_tx",
                message: status.message().to_string(),
            }),
        }
    }

    /// Look up a transaction by hash. `None` while it is not yet in a block;
    /// a transaction that failed on chain is reported as `ContractExecutionError`.
    pub async fn get_tx(&self, tx_hash: &str) -> Result<Option<TransactionResult>> {
        let ctx = TxContext::new("get_tx", "");
        match self.lookup_tx(tx_hash).await? {
            Some(response) => interpret_tx_response(response, &ctx).map(Some),
            None => Ok(None),
        }
    }

    async fn wait_for_inclusion(&self, tx_hash: &str, ctx: &TxContext) -> Result<TransactionResult> {
        let response = poll_inclusion(
            tx_hash,
            Duration::from_secs(self.config.broadcast_timeout),
            Duration::from_millis(self.config.poll_interval_ms.max(1)),
            || self.lookup_tx(tx_hash),
        )
        .await?;

        let result = interpret_tx_response(response, ctx)?;
        log::info!(
            "{} included at height {} (gas {}/{}): {}",
            ctx.operation,
            result.height,
            result.gas_used,
            result.gas_wanted,
            result.transaction_hash
        );
        Ok(result)
    }

    /// Estimate gas, check funds, sign, submit and wait for inclusion.
    /// Holds the sender's sequence lock for the whole sequence.
    async fn sign_and_submit(
        &self,
        signer: &Signer,
        messages: Vec<Any>,
        funds: &[Coin],
        mode: GasMode,
        ctx: &TxContext,
    ) -> Result<TransactionResult> {
        self.channel("broadcast")?;

        let lock = self.sequence_lock(signer.address());
        let _guard = lock.lock().await;

        submit_signed(
            self,
            &self.config.chain_id,
            &self.config.gas_price,
            signer,
            &messages,
            funds,
            mode,
            ctx,
        )
        .await
    }

    /// Execute a contract message as `signer` and wait for the result
    pub async fn broadcast_tx<M: ContractMessage>(
        &self,
        signer: &Signer,
        contract_address: &str,
        msg: &M,
        funds: Vec<Coin>,
        mode: GasMode,
    ) -> Result<TransactionResult> {
        let ctx = TxContext::new(&msg.operation(), contract_address);
        validate_address(contract_address).map_err(ChainError::InvalidArgument)?;

        let msg_bytes = msg.to_json_bytes()?;
        log::info!(
            "Executing {} on {}: {}",
            ctx.operation,
            contract_address,
            String::from_utf8_lossy(&msg_bytes)
        );

        let any = tx_builder::execute_contract_msg(signer.address(), contract_address, msg_bytes, funds.clone());
        self.sign_and_submit(signer, vec![any], &funds, mode, &ctx).await
    }

    /// Upload wasm byte code; returns the new code id
    pub async fn upload_code(&self, signer: &Signer, wasm_byte_code: Vec<u8>, mode: GasMode) -> Result<UploadResult> {
        let ctx = TxContext::new("store_code", "");
        log::info!("Uploading {} bytes of wasm", wasm_byte_code.len());

        let any = tx_builder::store_code_msg(signer.address(), wasm_byte_code)?;
        let transaction = self.sign_and_submit(signer, vec![any], &[], mode, &ctx).await?;

        let code_id = transaction
            .find_attribute("store_code", "code_id")
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| {
                ChainError::Encoding(format!(
                    "no code_id in store_code events of {}",
                    transaction.transaction_hash
                ))
            })?;

        log::info!("Uploaded code id {}", code_id);
        Ok(UploadResult { code_id, transaction })
    }

    /// Instantiate `code_id`; returns the new contract address
    #[allow(clippy::too_many_arguments)]
    pub async fn instantiate_contract<M: Serialize>(
        &self,
        signer: &Signer,
        code_id: u64,
        msg: &M,
        label: &str,
        admin: Option<&str>,
        funds: Vec<Coin>,
        mode: GasMode,
    ) -> Result<InstantiateResult> {
        let ctx = TxContext::new("instantiate", "");
        if let Some(admin) = admin {
            validate_address(admin).map_err(ChainError::InvalidArgument)?;
        }

        let msg_bytes = serde_json::to_vec(msg)?;
        log::info!("Instantiating code id {} as '{}'", code_id, label);

        let any = tx_builder::instantiate_contract_msg(
            signer.address(),
            admin,
            code_id,
            label,
            msg_bytes,
            funds.clone(),
        )?;
        let transaction = self.sign_and_submit(signer, vec![any], &funds, mode, &ctx).await?;

        let contract_address = transaction
            .find_attribute("instantiate", "_contract_address")
            .map(str::to_string)
            .ok_or_else(|| {
                ChainError::Encoding(format!(
                    "no contract address in instantiate events of {}",
                    transaction.transaction_hash
                ))
            })?;

        log::info!("Instantiated contract {}", contract_address);
        Ok(InstantiateResult {
            contract_address,
            transaction,
        })
    }
}

/// Chain access needed to build, submit and confirm a signed transaction
#[async_trait]
trait TxBackend: Send + Sync {
    async fn account(&self, address: &str) -> Result<AccountInfo>;
    async fn simulate_gas(&self, tx_bytes: Vec<u8>, ctx: &TxContext) -> Result<u64>;
    async fn balance(&self, address: &str, denom: &str) -> Result<Balance>;
    async fn broadcast(&self, tx_bytes: Vec<u8>, tx_hash: &str, ctx: &TxContext) -> Result<String>;
    async fn inclusion(&self, tx_hash: &str, ctx: &TxContext) -> Result<TransactionResult>;
}

#[async_trait]
impl TxBackend for ChainClient {
    async fn account(&self, address: &str) -> Result<AccountInfo> {
        self.query_account(address).await
    }

    async fn simulate_gas(&self, tx_bytes: Vec<u8>, ctx: &TxContext) -> Result<u64> {
        self.simulate(tx_bytes, ctx).await
    }

    async fn balance(&self, address: &str, denom: &str) -> Result<Balance> {
        self.get_balance(address, denom).await
    }

    async fn broadcast(&self, tx_bytes: Vec<u8>, tx_hash: &str, ctx: &TxContext) -> Result<String> {
        self.submit(tx_bytes, tx_hash, ctx).await
    }

    async fn inclusion(&self, tx_hash: &str, ctx: &TxContext) -> Result<TransactionResult> {
        self.wait_for_inclusion(tx_hash, ctx).await
    }
}

/// Nothing reaches `broadcast` unless the sender can pay the fee plus
/// same-denom funds.
#[allow(clippy::too_many_arguments)]
async fn submit_signed<B: TxBackend + ?Sized>(
    backend: &B,
    chain_id: &str,
    gas_price: &GasPrice,
    signer: &Signer,
    messages: &[Any],
    funds: &[Coin],
    mode: GasMode,
    ctx: &TxContext,
) -> Result<TransactionResult> {
    let sender = signer.address();
    let account = backend.account(sender).await?;
    log::debug!(
        "Account sequence: {}, account_number: {}",
        account.sequence,
        account.account_number
    );

    let builder = TxBuilder::new(chain_id, account.account_number, account.sequence, signer);

    let gas_limit = match mode {
        GasMode::Explicit(gas_limit) => gas_limit,
        GasMode::Auto { multiplier } => {
            let multiplier = validate_gas_adjustment(multiplier)?;
            let gas_used = backend
                .simulate_gas(builder.build_simulation_tx(messages)?, ctx)
                .await?;
            let adjusted = adjusted_gas(gas_used, multiplier);
            log::debug!("Gas simulation: used={}, adjusted={}", gas_used, adjusted);
            adjusted
        }
    };

    let fee_coin = gas_price.fee(gas_limit)?;
    let required = required_amount(&fee_coin, funds)?;
    let balance = backend.balance(sender, &fee_coin.denom).await?;
    if let Err(e) = ensure_sufficient_funds(&fee_coin.denom, required, balance.amount) {
        log::warn!("Not broadcasting {}: {}", ctx.operation, e);
        return Err(e);
    }

    let tx_bytes = builder.build_signed_tx(messages, tx_builder::fee(fee_coin, gas_limit))?;
    let local_hash = tx_builder::tx_hash(&tx_bytes);
    let tx_hash = backend.broadcast(tx_bytes, &local_hash, ctx).await?;

    backend.inclusion(&tx_hash, ctx).await
}

/// Poll `lookup` until the transaction shows up or `timeout` elapses.
/// Once a transaction is accepted its hash must survive, so lookup failures
/// are logged and polling continues; each lookup is bounded by the deadline.
async fn poll_inclusion<F, Fut>(
    tx_hash: &str,
    timeout: Duration,
    poll_interval: Duration,
    mut lookup: F,
) -> Result<TxResponse>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<TxResponse>>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match tokio::time::timeout_at(deadline, lookup()).await {
            Ok(Ok(Some(response))) => return Ok(response),
            Ok(Ok(None)) => log::debug!("{} not included yet", tx_hash),
            Ok(Err(e)) => log::warn!("Lookup of {} failed, still waiting: {}", tx_hash, e),
            Err(_) => log::warn!("Lookup of {} did not answer before the deadline", tx_hash),
        }

        let now = Instant::now();
        if now >= deadline {
            log::warn!("Gave up waiting for {} after {:?}", tx_hash, timeout);
            return Err(ChainError::BroadcastTimeout {
                tx_hash: tx_hash.to_string(),
                waited_secs: timeout.as_secs(),
            });
        }

        tokio::time::sleep_until((now + poll_interval).min(deadline)).await;
    }
}

/// Network-level failures, as opposed to the node answering with an error
fn is_connection_failure(status: &Status) -> bool {
    match status.code() {
        Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => true,
        Code::Unknown => {
            let message = status.message().to_ascii_lowercase();
            message.contains("transport error") || message.contains("error trying to connect")
        }
        _ => false,
    }
}

fn is_not_found(status: &Status) -> bool {
    status.code() == Code::NotFound || status.message().contains("not found")
}

/// Turn an included transaction into a result, or an error if it failed on chain
fn interpret_tx_response(response: TxResponse, ctx: &TxContext) -> Result<TransactionResult> {
    if response.code != 0 {
        return Err(ChainError::ContractExecutionError {
            operation: ctx.operation.clone(),
            contract: ctx.contract.clone(),
            tx_hash: Some(response.txhash),
            code: response.code,
            log: if response.raw_log.is_empty() {
                format!("codespace {}", response.codespace)
            } else {
                response.raw_log
            },
        });
    }

    let raw_events = response
        .events
        .iter()
        .map(|event| Event {
            kind: event.r#type.clone(),
            attributes: event
                .attributes
                .iter()
                .map(|attr| EventAttribute {
                    key: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                    value: String::from_utf8_lossy(attr.value.as_ref()).into_owned(),
                })
                .collect(),
        })
        .collect();

    Ok(TransactionResult {
        transaction_hash: response.txhash,
        height: response.height,
        gas_used: u64::try_from(response.gas_used).unwrap_or_default(),
        gas_wanted: u64::try_from(response.gas_wanted).unwrap_or_default(),
        raw_events,
    })
}
