//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Returns all validation
//! errors, not just the first, so a config can be fixed in one pass. A
//! placeholder contract address is deliberately NOT an error here: the client
//! starts with dependent operations disabled and a visible warning instead.

use alloy::primitives::Address;

use crate::config::schema::ClientConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError {
            field: "chain.rpc_url",
            message: format!("'{}' is not a valid URL", config.chain.rpc_url),
        });
    }
    if config.chain.chain_id == 0 {
        errors.push(ValidationError {
            field: "chain.chain_id",
            message: "chain id must be nonzero".to_string(),
        });
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "chain.rpc_timeout_secs",
            message: "timeout must be nonzero".to_string(),
        });
    }
    if config.chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "chain.confirmation_timeout_secs",
            message: "timeout must be nonzero".to_string(),
        });
    }

    // Addresses must at least parse; the zero placeholder is allowed.
    check_address(&config.contracts.token_address, "contracts.token_address", &mut errors);
    check_address(&config.contracts.swap_address, "contracts.swap_address", &mut errors);

    if config.relayer.url.parse::<url::Url>().is_err() {
        errors.push(ValidationError {
            field: "relayer.url",
            message: format!("'{}' is not a valid URL", config.relayer.url),
        });
    }
    if config.relayer.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "relayer.request_timeout_secs",
            message: "timeout must be nonzero".to_string(),
        });
    }
    if config.relayer.wallet_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "relayer.wallet_timeout_secs",
            message: "timeout must be nonzero".to_string(),
        });
    }
    if config.relayer.grant_duration_days == 0 {
        errors.push(ValidationError {
            field: "relayer.grant_duration_days",
            message: "grant validity window must be at least one day".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(raw: &str, field: &'static str, errors: &mut Vec<ValidationError>) {
    if raw.parse::<Address>().is_err() {
        errors.push(ValidationError {
            field,
            message: format!("'{}' is not a valid address", raw),
        });
    }
}
