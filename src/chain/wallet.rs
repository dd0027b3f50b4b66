//! Holder signing capability.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or explicit hex
//! - Keys are never logged or serialized
//!
//! The `HolderWallet` trait is the seam the decryption session signs through:
//! a local key in the CLI, a prompting wallet in an interactive front end,
//! and declining fakes in tests.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::{Signature, Signer};
use alloy::sol_types::Eip712Domain;
use async_trait::async_trait;

use crate::error::{ClientError, ClientResult};
use crate::relayer::types::UserDecryptRequestVerification;

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "CZAMA_PRIVATE_KEY";

/// A holder's capability to sign decryption grants.
///
/// Implementations map a rejected prompt to `AuthorizationDeclined`; the
/// session never contacts the relayer after a decline.
#[async_trait]
pub trait HolderWallet: Send + Sync {
    /// The holder account this wallet signs for.
    fn address(&self) -> Address;

    /// Produce the EIP-712 signature over a grant draft. Suspends awaiting
    /// wallet interaction.
    async fn sign_grant(
        &self,
        domain: &Eip712Domain,
        grant: &UserDecryptRequestVerification,
    ) -> ClientResult<Signature>;
}

/// In-process wallet over a raw private key.
#[derive(Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
}

impl LocalWallet {
    /// Create a wallet from a hex-encoded private key string, with or without
    /// the 0x prefix. The key is never logged.
    pub fn from_private_key(private_key_hex: &str) -> ClientResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex.parse().map_err(|_| {
            ClientError::SignerUnavailable("invalid private key format".to_string())
        })?;

        tracing::info!(address = %signer.address(), "wallet initialized");

        Ok(Self { signer })
    }

    /// Load wallet from the `CZAMA_PRIVATE_KEY` environment variable.
    pub fn from_env() -> ClientResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ClientError::SignerUnavailable(format!(
                "environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// The underlying signer, for building a transaction-sending provider.
    pub fn signer(&self) -> PrivateKeySigner {
        self.signer.clone()
    }
}

#[async_trait]
impl HolderWallet for LocalWallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_grant(
        &self,
        domain: &Eip712Domain,
        grant: &UserDecryptRequestVerification,
    ) -> ClientResult<Signature> {
        self.signer
            .sign_typed_data(grant, domain)
            .await
            .map_err(|e| ClientError::SignerUnavailable(format!("signing failed: {}", e)))
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.signer.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relayer::types::{decryption_domain, AuthorizationGrant, DecryptionKeypair};

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn wallet_from_private_key() {
        let wallet = LocalWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn wallet_with_0x_prefix() {
        let wallet = LocalWallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn invalid_private_key() {
        let result = LocalWallet::from_private_key("invalid_key");
        assert!(matches!(result, Err(ClientError::SignerUnavailable(_))));
    }

    #[tokio::test]
    async fn signs_a_grant() {
        let wallet = LocalWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let keypair = DecryptionKeypair::generate();
        let contract = "0xc690a88373Bf0E788e3B53015b87A58AF7A31D5b".parse().unwrap();
        let grant =
            AuthorizationGrant::new(keypair.public_bytes(), vec![contract], 1_700_000_000, 10);

        let domain = decryption_domain(11155111);
        let signature = wallet.sign_grant(&domain, &grant.typed_message()).await.unwrap();
        assert_eq!(signature.as_bytes().len(), 65);
    }
}
