//! Swap transaction submission and confirmation.
//!
//! # Responsibilities
//! - Validate the ETH amount before any encoding or network call
//! - Submit `swap()` / `swap(recipient)` and wait for one confirmation
//! - Surface reverts once, with the reason when available
//!
//! No implicit retry anywhere: a failed or reverted swap is reported once and
//! the caller decides whether to resubmit (a fresh transaction, never a
//! resend of a stuck one).

use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{utils::parse_ether, Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;

use crate::chain::types::{ICZamaSwap, SwapReceipt};
use crate::chain::wallet::LocalWallet;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Swap submission, as seen by the orchestrator.
#[async_trait]
pub trait SwapSubmits: Send + Sync {
    /// Swap `amount_eth` (decimal ETH string) for confidential units, minted
    /// to `recipient` or to the sender when `None`. Suspends until one
    /// confirmation.
    async fn submit_swap(
        &self,
        amount_eth: &str,
        recipient: Option<Address>,
    ) -> ClientResult<SwapReceipt>;
}

/// Parse a user-supplied decimal ETH amount into wei.
///
/// Fails fast with `InvalidAmount` on anything that is not a well-formed
/// non-negative decimal; performs no network call.
pub fn parse_eth_amount(amount_eth: &str) -> ClientResult<U256> {
    let trimmed = amount_eth.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidAmount(amount_eth.to_string()));
    }
    parse_ether(trimmed).map_err(|_| ClientError::InvalidAmount(amount_eth.to_string()))
}

/// RPC-backed submitter holding the holder's transaction signer.
#[derive(Clone)]
pub struct RpcSwapSubmitter {
    provider: DynProvider,
    swap_address: Address,
    sender: Address,
    confirmation_timeout: Duration,
    rpc_timeout: Duration,
}

impl RpcSwapSubmitter {
    /// Build a submitter from validated configuration and the holder wallet.
    pub fn from_config(config: &ClientConfig, wallet: &LocalWallet) -> ClientResult<Self> {
        let swap_address = config.contracts.swap()?;

        let rpc_url: url::Url = config
            .chain
            .rpc_url
            .parse()
            .map_err(|e| ClientError::NetworkReadFailed(format!("invalid RPC URL: {}", e)))?;

        let signer = wallet.signer();
        let sender = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        tracing::info!(swap = %swap_address, sender = %sender, "swap submitter initialized");

        Ok(Self {
            provider,
            swap_address,
            sender,
            confirmation_timeout: Duration::from_secs(config.chain.confirmation_timeout_secs),
            rpc_timeout: Duration::from_secs(config.chain.rpc_timeout_secs),
        })
    }
}

#[async_trait]
impl SwapSubmits for RpcSwapSubmitter {
    async fn submit_swap(
        &self,
        amount_eth: &str,
        recipient: Option<Address>,
    ) -> ClientResult<SwapReceipt> {
        let value_wei = parse_eth_amount(amount_eth)?;
        let swap = ICZamaSwap::new(self.swap_address, self.provider.clone());

        // The contract reverts with CZamaSwapZeroOutput for dust amounts;
        // catching it via the pure quote avoids burning gas on a doomed tx.
        let out_units = tokio::time::timeout(self.rpc_timeout, swap.quote(value_wei).call())
            .await
            .map_err(|_| ClientError::Timeout {
                operation: "quote",
                secs: self.rpc_timeout.as_secs(),
            })?
            .map_err(|e| ClientError::NetworkReadFailed(format!("quote: {}", e)))?;
        if out_units == 0 {
            return Err(ClientError::SwapReverted(
                "CZamaSwapZeroOutput: computed output is zero".to_string(),
            ));
        }

        let to = recipient.unwrap_or(self.sender);
        // swap_0 is swap(), swap_1 is swap(address); alloy suffixes overloads.
        let pending = if recipient.is_some() {
            swap.swap_1(to).value(value_wei).send().await
        } else {
            swap.swap_0().value(value_wei).send().await
        }
        .map_err(|e| classify_send_error(&e))?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, recipient = %to, "swap transaction sent");

        let receipt = pending
            .with_required_confirmations(1)
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|e| {
                let text = e.to_string();
                if text.contains("timed out") || text.contains("timeout") {
                    ClientError::Timeout {
                        operation: "swap confirmation",
                        secs: self.confirmation_timeout.as_secs(),
                    }
                } else {
                    ClientError::NetworkReadFailed(format!("confirmation: {}", text))
                }
            })?;

        if !receipt.status() {
            return Err(ClientError::SwapReverted(
                "transaction reverted on-chain".to_string(),
            ));
        }

        let block_number = receipt.block_number.unwrap_or_default();
        tracing::info!(tx_hash = %tx_hash, block_number, "swap confirmed");

        Ok(SwapReceipt {
            tx_hash,
            block_number,
            recipient: to,
        })
    }
}

fn classify_send_error(error: &alloy::contract::Error) -> ClientError {
    let text = error.to_string();
    if text.contains("revert") || text.contains("CZamaSwapZeroOutput") {
        ClientError::SwapReverted(text)
    } else {
        ClientError::NetworkReadFailed(text)
    }
}

impl std::fmt::Debug for RpcSwapSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcSwapSubmitter")
            .field("swap_address", &self.swap_address)
            .field("sender", &self.sender)
            .finish()
    }
}
