//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → TokenInfoConfig (validated, immutable)
//!
//! Environment:
//!     TOKEN_INFO_MNEMONIC     → wallet (never stored in config)
//!     TOKEN_INFO_ALGOD_TOKEN  → algod API token header
//! ```
//!
//! # Design Decisions
//! - Config is loaded once per invocation
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AppConfig, ConfirmationConfig, NodeConfig, ObservabilityConfig, TokenInfoConfig,
    TransactionConfig,
};
