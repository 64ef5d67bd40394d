//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, round budget > 0)
//! - Check endpoint URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TokenInfoConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::TokenInfoConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &TokenInfoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.node.url) {
        errors.push(ValidationError::new("node.url", format!("invalid URL: {}", e)));
    }
    for (i, failover) in config.node.failover_urls.iter().enumerate() {
        if let Err(e) = url::Url::parse(failover) {
            errors.push(ValidationError::new(
                format!("node.failover_urls[{}]", i),
                format!("invalid URL: {}", e),
            ));
        }
    }
    if config.node.api_token_header.trim().is_empty() {
        errors.push(ValidationError::new("node.api_token_header", "must not be empty"));
    }
    if config.node.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("node.rpc_timeout_secs", "must be positive"));
    }
    if config.node.round_wait_timeout_secs == 0 {
        errors.push(ValidationError::new("node.round_wait_timeout_secs", "must be positive"));
    }

    if config.confirmation.max_rounds == 0 {
        errors.push(ValidationError::new("confirmation.max_rounds", "must be positive"));
    }
    if config.confirmation.deadline_secs == Some(0) {
        errors.push(ValidationError::new("confirmation.deadline_secs", "must be positive when set"));
    }

    if config.transaction.fee_multiplier == 0 {
        errors.push(ValidationError::new("transaction.fee_multiplier", "must be at least 1"));
    }
    if config.transaction.validity_rounds == 0 || config.transaction.validity_rounds > 1000 {
        errors.push(ValidationError::new(
            "transaction.validity_rounds",
            "must be between 1 and 1000",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
