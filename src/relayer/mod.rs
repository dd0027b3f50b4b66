//! Relayer decryption subsystem.
//!
//! # Data Flow
//! ```text
//! (handle, contract) pairs + holder signing capability
//!     → session.rs (keypair, grant, typed-data signature)
//!     → client.rs (HTTP round trip to the relayer)
//!     → plaintext per handle
//! ```
//!
//! # Security Constraints
//! - Ephemeral keypair per call, zeroized on drop, never reused
//! - Grant names the exact contract addresses being decrypted
//! - Relayer connection is shared, lazily initialized once per process

pub mod client;
pub mod session;
pub mod types;

pub use client::{HttpRelayer, RelayerApi, RelayerHandle};
pub use session::DecryptionClient;
pub use types::{
    decryption_domain, AuthorizationGrant, DecryptionKeypair, DecryptionResult,
    HandleContractPair, UserDecryptRequest, UserDecryptResponse,
};
