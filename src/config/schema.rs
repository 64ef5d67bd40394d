//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tool.
//! All types derive Serde traits for deserialization from config files.
//! Secrets never live here; they are read from the environment.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TokenInfoConfig {
    /// algod endpoint settings.
    pub node: NodeConfig,

    /// Confirmation wait policy.
    pub confirmation: ConfirmationConfig,

    /// Transaction building parameters.
    pub transaction: TransactionConfig,

    /// Default target for the `set` command.
    pub app: AppConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// algod node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// algod REST base URL.
    pub url: String,

    /// Failover algod URLs, tried in order after `url`.
    pub failover_urls: Vec<String>,

    /// Header carrying the API token (`X-API-Key` for hosted providers).
    pub api_token_header: String,

    /// Per-request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Timeout for a single wait-for-block long poll.
    pub round_wait_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4001".to_string(),
            failover_urls: Vec::new(),
            api_token_header: "X-Algo-API-Token".to_string(),
            rpc_timeout_secs: 10,
            round_wait_timeout_secs: 70,
        }
    }
}

/// Confirmation wait policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Ledger rounds to wait before giving up. Counted in rounds, not seconds.
    pub max_rounds: u64,

    /// Optional wall-clock bound on the whole wait.
    pub deadline_secs: Option<u64>,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_rounds: 4,
            deadline_secs: None,
        }
    }
}

/// Transaction building parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Flat fee as a multiple of the network minimum fee.
    pub fee_multiplier: u64,

    /// Number of rounds after `first_valid` the transaction stays valid.
    pub validity_rounds: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            fee_multiplier: 2,
            validity_rounds: 1000,
        }
    }
}

/// Default application call target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_id: u64,
    pub asset_id: u64,
    pub buffer_size: u64,
    pub token_config: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: 0,
            asset_id: 0,
            buffer_size: 500,
            token_config: 1,
        }
    }
}

/// Logging and metrics settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Expose a Prometheus scrape endpoint while running.
    pub metrics_enabled: bool,

    /// Metrics listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
