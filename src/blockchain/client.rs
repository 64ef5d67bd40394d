//! algod REST client with timeout and failover handling.
//!
//! # Responsibilities
//! - Talk to one or more algod endpoints (primary + failovers)
//! - Query node status, pending transactions and suggested params
//! - Submit signed transactions
//! - Handle timeouts and network errors gracefully
//! - Provide health check for node connectivity

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::confirmation::NodeQuery;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, NodeConfig, NodeErrorBody, NodeStatus, PendingStatus,
    SubmitResponse, SuggestedParams,
};
use crate::observability::metrics;

/// Environment variable holding the algod API token.
pub const API_TOKEN_ENV_VAR: &str = "TOKEN_INFO_ALGOD_TOKEN";

/// algod client wrapper with failover support.
#[derive(Clone)]
pub struct AlgodClient {
    http: reqwest::Client,
    /// Base URLs (primary + failovers), without trailing slash.
    endpoints: Vec<String>,
    /// API token, sent in `config.api_token_header`. Never logged.
    api_token: Option<String>,
    config: NodeConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
    /// Timeout for a single wait-for-block long poll.
    round_wait_duration: Duration,
}

impl AlgodClient {
    /// Create a new algod client.
    ///
    /// # Arguments
    /// * `config` - Node configuration
    /// * `api_token` - Token for the configured auth header, if the node needs one
    pub fn new(config: NodeConfig, api_token: Option<String>) -> BlockchainResult<Self> {
        let mut endpoints = Vec::new();

        // 1. Add primary endpoint
        url::Url::parse(&config.url).map_err(|e| {
            BlockchainError::Rpc(format!("Invalid algod URL '{}': {}", config.url, e))
        })?;
        endpoints.push(config.url.trim_end_matches('/').to_string());

        // 2. Add failover endpoints
        for url_str in &config.failover_urls {
            if url::Url::parse(url_str).is_ok() {
                endpoints.push(url_str.trim_end_matches('/').to_string());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover algod URL");
            }
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BlockchainError::Rpc(format!("HTTP client setup failed: {}", e)))?;

        tracing::info!(
            url = %config.url,
            failovers = endpoints.len() - 1,
            authenticated = api_token.is_some(),
            "algod client initialized"
        );

        Ok(Self {
            http,
            endpoints,
            api_token: api_token.filter(|token| !token.is_empty()),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            round_wait_duration: Duration::from_secs(config.round_wait_timeout_secs),
            config,
        })
    }

    /// Create a client whose API token comes from `TOKEN_INFO_ALGOD_TOKEN`.
    pub fn from_env(config: NodeConfig) -> BlockchainResult<Self> {
        Self::new(config, std::env::var(API_TOKEN_ENV_VAR).ok())
    }

    /// Get the current node status.
    pub async fn status(&self) -> BlockchainResult<NodeStatus> {
        self.get_json("status", "/v2/status", self.timeout_duration).await
    }

    /// Long-poll until the node has seen a block after `round`, or the node's
    /// own poll window closes. The returned round may still equal `round`.
    pub async fn status_after_block(&self, round: u64) -> BlockchainResult<NodeStatus> {
        let path = format!("/v2/status/wait-for-block-after/{}", round);
        self.get_json("status_after_block", &path, self.round_wait_duration).await
    }

    /// Block until the node reports a last round past `round`.
    pub async fn wait_for_round_after(&self, round: u64) -> BlockchainResult<NodeStatus> {
        loop {
            let status = self.status_after_block(round).await?;
            if status.last_round > round {
                return Ok(status);
            }
            tracing::debug!(round, last_round = status.last_round, "No new block yet, polling again");
        }
    }

    /// Get pending-pool information for a transaction.
    pub async fn pending_transaction_information(
        &self,
        tx_id: &str,
    ) -> BlockchainResult<PendingStatus> {
        let path = format!("/v2/transactions/pending/{}?format=json", tx_id);
        self.get_json("pending_transaction", &path, self.timeout_duration).await
    }

    /// Get suggested transaction parameters.
    pub async fn suggested_params(&self) -> BlockchainResult<SuggestedParams> {
        self.get_json("suggested_params", "/v2/transactions/params", self.timeout_duration)
            .await
    }

    /// Submit a signed, msgpack-encoded transaction. Returns the node's tx id.
    pub async fn send_raw_transaction(&self, signed: &[u8]) -> BlockchainResult<String> {
        let response: SubmitResponse = self
            .execute("send_raw_transaction", self.timeout_duration, |base| {
                self.http
                    .post(format!("{}/v2/transactions", base))
                    .header(reqwest::header::CONTENT_TYPE, "application/x-binary")
                    .body(signed.to_vec())
            })
            .await?;
        Ok(response.tx_id)
    }

    /// Check if the node is reachable.
    ///
    /// Returns true if we can query the node status.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.status().await.is_ok();
        metrics::record_node_health(healthy);
        healthy
    }

    /// Get the configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        limit: Duration,
    ) -> BlockchainResult<T> {
        self.execute(operation, limit, |base| self.http.get(format!("{}{}", base, path)))
            .await
    }

    /// Run a request against each endpoint in order until one answers.
    ///
    /// Transport failures and timeouts move on to the next endpoint. An HTTP
    /// answer from a node (success or not) is final.
    async fn execute<T, F>(
        &self,
        operation: &'static str,
        limit: Duration,
        build: F,
    ) -> BlockchainResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let mut last_error = None;

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            let request = self.authorize(build(endpoint));
            let attempt = async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| BlockchainError::Rpc(e.to_string()))?;
                decode_response(response).await
            };

            match timeout(limit, attempt).await {
                Ok(Ok(result)) => {
                    metrics::record_node_request(operation, "ok");
                    return Ok(result);
                }
                Ok(Err(BlockchainError::Rpc(e))) => {
                    tracing::warn!(endpoint_idx = i, operation, error = %e, "algod error, trying next endpoint");
                    last_error = Some(BlockchainError::Rpc(e));
                }
                Ok(Err(e)) => {
                    metrics::record_node_request(operation, "error");
                    return Err(e);
                }
                Err(_) => {
                    tracing::warn!(endpoint_idx = i, operation, "algod timeout, trying next endpoint");
                    last_error = Some(BlockchainError::Timeout(limit.as_secs()));
                }
            }
        }

        metrics::record_node_request(operation, "unreachable");
        Err(last_error.unwrap_or_else(|| {
            BlockchainError::Rpc(format!("No algod endpoint available for {}", operation))
        }))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.header(self.config.api_token_header.as_str(), token.as_str()),
            None => request,
        }
    }
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> BlockchainResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<NodeErrorBody>(&body)
            .map(|err| err.message)
            .unwrap_or(body);
        return Err(BlockchainError::Node {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| BlockchainError::Rpc(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| BlockchainError::Decode(e.to_string()))
}

#[async_trait]
impl NodeQuery for AlgodClient {
    async fn status(&self) -> BlockchainResult<NodeStatus> {
        AlgodClient::status(self).await
    }

    async fn pending_transaction_information(&self, tx_id: &str) -> BlockchainResult<PendingStatus> {
        AlgodClient::pending_transaction_information(self, tx_id).await
    }

    async fn wait_for_round_after(&self, round: u64) -> BlockchainResult<NodeStatus> {
        AlgodClient::wait_for_round_after(self, round).await
    }
}

impl std::fmt::Debug for AlgodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgodClient")
            .field("url", &self.config.url)
            .field("failovers", &self.config.failover_urls.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
