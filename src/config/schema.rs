//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so minimal configs load.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Root configuration for the swap client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Chain connectivity settings.
    pub chain: ChainConfig,

    /// Deployed contract addresses.
    pub contracts: ContractConfig,

    /// Relayer decryption service settings.
    pub relayer: RelayerConfig,
}

/// Chain connectivity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 11155111 for Sepolia).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for one swap confirmation in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 11155111,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
        }
    }
}

/// Deployed contract addresses.
///
/// The zero address is the well-known "not yet deployed" placeholder; it
/// disables every dependent operation rather than attempting calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Confidential token contract address.
    pub token_address: String,

    /// Swap contract address.
    pub swap_address: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            token_address: Address::ZERO.to_string(),
            swap_address: Address::ZERO.to_string(),
        }
    }
}

impl ContractConfig {
    /// Token contract address, or `NotConfigured` if absent or placeholder.
    pub fn token(&self) -> ClientResult<Address> {
        configured_address(&self.token_address, "token contract")
    }

    /// Swap contract address, or `NotConfigured` if absent or placeholder.
    pub fn swap(&self) -> ClientResult<Address> {
        configured_address(&self.swap_address, "swap contract")
    }

    /// True when both contract addresses are set to real deployments.
    pub fn is_configured(&self) -> bool {
        self.token().is_ok() && self.swap().is_ok()
    }
}

/// Relayer decryption service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayerConfig {
    /// Relayer HTTP endpoint URL.
    pub url: String,

    /// Relayer round-trip timeout in seconds.
    pub request_timeout_secs: u64,

    /// Upper bound on the wallet signature prompt in seconds. A human is in
    /// the loop, so this is generous.
    pub wallet_timeout_secs: u64,

    /// Validity window of a decryption grant in days. Short enough to bound
    /// exposure if a grant is later disclosed, long enough to cover a
    /// session without re-signing on every decrypt.
    pub grant_duration_days: u64,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            url: "https://relayer.testnet.zama.cloud".to_string(),
            request_timeout_secs: 30,
            wallet_timeout_secs: 120,
            grant_duration_days: 10,
        }
    }
}

fn configured_address(raw: &str, what: &'static str) -> ClientResult<Address> {
    let address: Address = raw.parse().map_err(|_| ClientError::NotConfigured(what))?;
    if address == Address::ZERO {
        return Err(ClientError::NotConfigured(what));
    }
    Ok(address)
}
