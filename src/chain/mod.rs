//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variables (private key) → wallet.rs (key loading, grant signing)
//! Config (RPC URL, contract addresses) → reader.rs (view calls with timeouts)
//!                                      → submitter.rs (swap tx, confirmation)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables or explicit hex
//! - Never log private keys or sensitive data
//! - All RPC calls have client-imposed timeouts

pub mod reader;
pub mod submitter;
pub mod types;
pub mod wallet;

pub use reader::{ChainReads, RpcChainReader};
pub use submitter::{parse_eth_amount, RpcSwapSubmitter, SwapSubmits};
pub use types::{EncryptedHandle, SwapReceipt};
pub use wallet::{HolderWallet, LocalWallet};
