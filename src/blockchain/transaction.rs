//! Transaction building, signing, submission and confirmation.
//!
//! # Responsibilities
//! - Turn a request-scoped `AppCallRequest` into an application NoOp call
//! - Apply the flat fee and validity window from suggested params
//! - Sign and submit
//! - Hand the transaction id to the confirmation waiter

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use serde_bytes::ByteBuf;
use tokio_util::sync::CancellationToken;

use crate::blockchain::client::AlgodClient;
use crate::blockchain::codec::{bytes_to_sign, encode_msgpack, encode_u64, transaction_id, Address};
use crate::blockchain::confirmation::await_confirmation;
use crate::blockchain::types::{BlockchainError, BlockchainResult, SuggestedParams};
use crate::blockchain::wallet::Wallet;
use crate::config::TransactionConfig;

/// Application-call action name understood by the token-info contract.
pub const TOKEN_INFO_ACTION: &str = "token-info";

const APPLICATION_CALL: &str = "appl";

/// Token configuration pushed to the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub asset_id: u64,
    pub buffer_size: u64,
    pub token_config: u64,
}

impl TokenInfo {
    /// Application call carrying this token info to `app_id`.
    pub fn into_app_call(self, app_id: u64) -> AppCallRequest {
        AppCallRequest {
            app_id,
            args: vec![
                TOKEN_INFO_ACTION.as_bytes().to_vec(),
                encode_u64(self.asset_id),
                encode_u64(self.buffer_size),
                encode_u64(self.token_config),
            ],
            accounts: Vec::new(),
            foreign_apps: Vec::new(),
            foreign_assets: vec![self.asset_id],
        }
    }
}

/// Parameters of one application NoOp call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCallRequest {
    pub app_id: u64,
    pub args: Vec<Vec<u8>>,
    pub accounts: Vec<Address>,
    pub foreign_apps: Vec<u64>,
    pub foreign_assets: Vec<u64>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Unsigned application call transaction.
///
/// Fields are declared in canonical (sorted) key order; zero and empty
/// values are skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "apaa", skip_serializing_if = "Vec::is_empty")]
    pub app_args: Vec<ByteBuf>,
    #[serde(rename = "apan", skip_serializing_if = "is_zero")]
    pub on_completion: u64,
    #[serde(rename = "apas", skip_serializing_if = "Vec::is_empty")]
    pub foreign_assets: Vec<u64>,
    #[serde(rename = "apat", skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Address>,
    #[serde(rename = "apfa", skip_serializing_if = "Vec::is_empty")]
    pub foreign_apps: Vec<u64>,
    #[serde(rename = "apid", skip_serializing_if = "is_zero")]
    pub app_id: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub fee: u64,
    #[serde(rename = "fv", skip_serializing_if = "is_zero")]
    pub first_valid: u64,
    #[serde(rename = "gen", skip_serializing_if = "String::is_empty")]
    pub genesis_id: String,
    #[serde(rename = "gh", with = "serde_bytes")]
    pub genesis_hash: Vec<u8>,
    #[serde(rename = "lv", skip_serializing_if = "is_zero")]
    pub last_valid: u64,
    #[serde(rename = "snd")]
    pub sender: Address,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl Transaction {
    /// Transaction id.
    pub fn id(&self) -> BlockchainResult<String> {
        transaction_id(self)
    }
}

/// Signature envelope submitted to the node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedTransaction {
    #[serde(with = "serde_bytes")]
    pub sig: Vec<u8>,
    pub txn: Transaction,
}

impl SignedTransaction {
    /// msgpack bytes for `/v2/transactions`.
    pub fn encode(&self) -> BlockchainResult<Vec<u8>> {
        encode_msgpack(self)
    }
}

/// Outcome of a confirmed application call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedCall {
    pub tx_id: String,
    pub confirmed_round: u64,
    /// App id reported by the node for the confirmed call.
    pub app_id: Option<u64>,
}

/// Builds, signs and submits application calls.
pub struct TxBuilder {
    client: AlgodClient,
    wallet: Wallet,
    config: TransactionConfig,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: AlgodClient, wallet: Wallet, config: TransactionConfig) -> Self {
        Self {
            client,
            wallet,
            config,
        }
    }

    /// Build an application NoOp call from fresh suggested params.
    pub async fn build(&self, request: &AppCallRequest) -> BlockchainResult<Transaction> {
        let params = self.client.suggested_params().await?;
        build_app_call(self.wallet.address(), &params, &self.config, request)
    }

    /// Sign a transaction with the builder's wallet.
    pub fn sign(&self, txn: Transaction) -> BlockchainResult<SignedTransaction> {
        let sig = self.wallet.sign(&bytes_to_sign(&txn)?);
        Ok(SignedTransaction {
            sig: sig.to_vec(),
            txn,
        })
    }

    /// Submit a signed transaction, returning its id.
    pub async fn submit(&self, signed: &SignedTransaction) -> BlockchainResult<String> {
        let local_id = signed.txn.id()?;
        let node_id = match self.client.send_raw_transaction(&signed.encode()?).await {
            Ok(node_id) => node_id,
            // An earlier attempt reached a node before its connection dropped.
            Err(e) if e.is_duplicate_submission() => {
                tracing::warn!(tx_id = %local_id, error = %e, "Transaction already known to the node");
                return Ok(local_id);
            }
            Err(e) => return Err(e),
        };
        if node_id != local_id {
            tracing::warn!(local_id = %local_id, node_id = %node_id, "Node reported a different tx id");
        }
        tracing::info!(tx_id = %node_id, "Raw transaction submitted");
        Ok(node_id)
    }

    /// Wait for a transaction to be confirmed.
    ///
    /// # Arguments
    /// * `tx_id` - Transaction id to monitor
    /// * `max_rounds` - Ledger rounds to wait before giving up
    /// * `cancel` - Aborts the wait at the next round boundary
    pub async fn wait_for_confirmation(
        &self,
        tx_id: &str,
        max_rounds: u64,
        cancel: &CancellationToken,
    ) -> BlockchainResult<u64> {
        await_confirmation(&self.client, tx_id, max_rounds, cancel).await
    }

    /// Build, sign, submit and confirm an application call.
    pub async fn execute(
        &self,
        request: &AppCallRequest,
        max_rounds: u64,
        cancel: &CancellationToken,
    ) -> BlockchainResult<ConfirmedCall> {
        let txn = self.build(request).await?;
        let local_id = txn.id()?;
        tracing::info!(tx_id = %local_id, app_id = request.app_id, "Application call built");

        let signed = self.sign(txn)?;
        let tx_id = self.submit(&signed).await?;
        let confirmed_round = self.wait_for_confirmation(&tx_id, max_rounds, cancel).await?;

        // The app id is informational; the call is already confirmed.
        let app_id = match self.client.pending_transaction_information(&tx_id).await {
            Ok(pending) => pending.app_id(),
            Err(e) => {
                tracing::warn!(tx_id = %tx_id, error = %e, "Could not read app id of confirmed call");
                None
            }
        };
        Ok(ConfirmedCall {
            tx_id,
            confirmed_round,
            app_id,
        })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

/// Assemble the application call from suggested params.
pub fn build_app_call(
    sender: Address,
    params: &SuggestedParams,
    config: &TransactionConfig,
    request: &AppCallRequest,
) -> BlockchainResult<Transaction> {
    let genesis_hash = STANDARD
        .decode(&params.genesis_hash)
        .map_err(|e| BlockchainError::Decode(format!("genesis hash: {}", e)))?;
    if genesis_hash.len() != 32 {
        return Err(BlockchainError::Decode(format!(
            "genesis hash: expected 32 bytes, got {}",
            genesis_hash.len()
        )));
    }

    // Flat fee, as a multiple of the network minimum.
    let fee = params.min_fee.saturating_mul(config.fee_multiplier);

    Ok(Transaction {
        app_args: request.args.iter().cloned().map(ByteBuf::from).collect(),
        on_completion: 0,
        foreign_assets: request.foreign_assets.clone(),
        accounts: request.accounts.clone(),
        foreign_apps: request.foreign_apps.clone(),
        app_id: request.app_id,
        fee,
        first_valid: params.last_round,
        genesis_id: params.genesis_id.clone(),
        genesis_hash,
        last_valid: params.last_round.saturating_add(config.validity_rounds),
        sender,
        kind: APPLICATION_CALL,
    })
}
