//! Client error taxonomy.
//!
//! Every failure an operation can surface is a variant here; operations never
//! panic into caller state. No variant is retried automatically — a retry is
//! always a fresh user-initiated attempt with fresh key material where
//! relevant.

use thiserror::Error;

use crate::chain::types::EncryptedHandle;

/// Errors surfaced by swap and decryption operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A contract address is the zero placeholder; dependent operations are
    /// disabled until configuration is synced.
    #[error("contracts not configured: {0}")]
    NotConfigured(&'static str),

    /// No signing capability is available for the holder.
    #[error("wallet signer unavailable: {0}")]
    SignerUnavailable(String),

    /// The supplied amount is not a well-formed positive decimal.
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// A read-only chain call failed.
    #[error("chain read failed: {0}")]
    NetworkReadFailed(String),

    /// The swap transaction reverted on-chain, with the reason if available.
    #[error("swap reverted: {0}")]
    SwapReverted(String),

    /// Relayer connection was never established or its initialization failed.
    /// Distinct from a single request failing.
    #[error("relayer unavailable: {0}")]
    RelayerUnavailable(String),

    /// The holder rejected the grant signature prompt.
    #[error("decryption authorization declined by holder")]
    AuthorizationDeclined,

    /// A single relayer round trip failed in transport.
    #[error("relayer request failed: {0}")]
    RelayerRequestFailed(String),

    /// The relayer response did not contain a plaintext for this handle.
    #[error("no plaintext returned for handle {0}")]
    DecryptionIncomplete(EncryptedHandle),

    /// Decrypt was attempted before a balance handle was loaded, or with an
    /// empty/zero handle.
    #[error("no encrypted balance handle loaded")]
    NoHandleLoaded,

    /// A chain, wallet, or relayer wait exceeded its client-imposed bound.
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    /// An instance of this operation is already in flight for the session.
    #[error("{0} already in progress")]
    Busy(&'static str),
}

/// Result alias for all client operations.
pub type ClientResult<T> = Result<T, ClientError>;
