//! Client library for a fixed-rate ETH → confidential-token swap.
//!
//! Balances of the token are opaque on-chain ciphertext handles; the holder
//! decrypts their own balance through a relayer decryption service by signing
//! a time-bounded EIP-712 grant with per-call ephemeral key material. This
//! crate provides the chain reader, the swap submitter, the decryption
//! session protocol, and a per-user orchestrator that ties them together.

pub mod chain;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod relayer;

pub use chain::{EncryptedHandle, LocalWallet, RpcChainReader, RpcSwapSubmitter, SwapReceipt};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use orchestrator::{OpStatus, SwapSession};
pub use relayer::{DecryptionClient, HttpRelayer, RelayerHandle};
