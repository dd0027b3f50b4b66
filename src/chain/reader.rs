//! Read-only contract queries.
//!
//! # Responsibilities
//! - Fetch the holder's encrypted balance handle
//! - Quote the fixed-rate swap output for an input amount
//! - Handle timeouts and network errors gracefully
//!
//! Both queries are side-effect-free reads against the latest confirmed chain
//! state. A placeholder contract address short-circuits to `NotConfigured`
//! before any network call.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::chain::types::{EncryptedHandle, IConfidentialToken, ICZamaSwap};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Read-only chain queries, as seen by the orchestrator. Implemented over RPC
/// in production and by in-memory fakes in tests.
#[async_trait]
pub trait ChainReads: Send + Sync {
    /// Latest encrypted balance handle for `account`. Zero handle means no
    /// confidential balance has been recorded yet.
    async fn balance_handle(&self, account: Address) -> ClientResult<EncryptedHandle>;

    /// Output units for `amount_in_wei` at the fixed swap rate. Pure, no
    /// expiry.
    async fn quote(&self, amount_in_wei: U256) -> ClientResult<u64>;
}

/// RPC-backed chain reader.
#[derive(Clone)]
pub struct RpcChainReader {
    provider: DynProvider,
    token_address: Address,
    swap_address: Address,
    timeout_duration: Duration,
}

impl RpcChainReader {
    /// Build a reader from validated configuration.
    ///
    /// Fails with `NotConfigured` when either contract address is still the
    /// zero placeholder.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let token_address = config.contracts.token()?;
        let swap_address = config.contracts.swap()?;

        let rpc_url: url::Url = config
            .chain
            .rpc_url
            .parse()
            .map_err(|e| ClientError::NetworkReadFailed(format!("invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();

        tracing::info!(
            rpc_url = %config.chain.rpc_url,
            token = %token_address,
            swap = %swap_address,
            "chain reader initialized"
        );

        Ok(Self {
            provider,
            token_address,
            swap_address,
            timeout_duration: Duration::from_secs(config.chain.rpc_timeout_secs),
        })
    }

    /// Token contract address this reader queries.
    pub fn token_address(&self) -> Address {
        self.token_address
    }

    /// Token metadata for display: (name, symbol, decimals).
    pub async fn token_metadata(&self) -> ClientResult<(String, String, u8)> {
        let token = IConfidentialToken::new(self.token_address, self.provider.clone());
        let name = self.bounded("name", token.name().call()).await?;
        let symbol = self.bounded("symbol", token.symbol().call()).await?;
        let decimals = self.bounded("decimals", token.decimals().call()).await?;
        Ok((name, symbol, decimals))
    }

    async fn bounded<T, E, F>(&self, operation: &'static str, fut: F) -> ClientResult<T>
    where
        F: std::future::IntoFuture<Output = Result<T, E>>,
        F::IntoFuture: Send,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(operation, error = %e, "chain read failed");
                Err(ClientError::NetworkReadFailed(format!("{}: {}", operation, e)))
            }
            Err(_) => Err(ClientError::Timeout {
                operation,
                secs: self.timeout_duration.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl ChainReads for RpcChainReader {
    async fn balance_handle(&self, account: Address) -> ClientResult<EncryptedHandle> {
        let token = IConfidentialToken::new(self.token_address, self.provider.clone());
        let raw = self
            .bounded("confidentialBalanceOf", token.confidentialBalanceOf(account).call())
            .await?;
        Ok(EncryptedHandle::from(raw))
    }

    async fn quote(&self, amount_in_wei: U256) -> ClientResult<u64> {
        let swap = ICZamaSwap::new(self.swap_address, self.provider.clone());
        self.bounded("quote", swap.quote(amount_in_wei).call()).await
    }
}

impl std::fmt::Debug for RpcChainReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainReader")
            .field("token_address", &self.token_address)
            .field("swap_address", &self.swap_address)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
