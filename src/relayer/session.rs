//! The decryption session protocol.
//!
//! Turns `(handle, contract)` pairs plus the holder's signing capability into
//! authorized plaintext via the relayer:
//!
//! 1. generate a fresh ephemeral keypair for this call only
//! 2. draft a grant binding the key, the exact contract set, and a bounded
//!    validity window
//! 3. have the holder sign the grant as EIP-712 typed data
//! 4. submit the request to the relayer
//! 5. map returned plaintexts per handle
//!
//! Preconditions are checked in order with no partial progress; the keypair
//! never outlives the call, on success or failure.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::primitives::Address;
use tokio::time::timeout;

use crate::chain::wallet::HolderWallet;
use crate::config::RelayerConfig;
use crate::error::{ClientError, ClientResult};
use crate::relayer::client::{RelayerApi, RelayerHandle};
use crate::relayer::types::{
    decryption_domain, AuthorizationGrant, DecryptionKeypair, DecryptionResult,
    HandleContractPair, UserDecryptRequest,
};

/// Client-side orchestration of one user-scoped decryption.
pub struct DecryptionClient<R> {
    relayer: Arc<RelayerHandle<R>>,
    chain_id: u64,
    grant_duration_days: u64,
    wallet_timeout: Duration,
    relayer_timeout: Duration,
}

impl<R: RelayerApi> DecryptionClient<R> {
    pub fn new(relayer: Arc<RelayerHandle<R>>, chain_id: u64, config: &RelayerConfig) -> Self {
        Self {
            relayer,
            chain_id,
            grant_duration_days: config.grant_duration_days,
            wallet_timeout: Duration::from_secs(config.wallet_timeout_secs),
            relayer_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// The shared connection handle, for startup initialization and reset.
    pub fn relayer(&self) -> &RelayerHandle<R> {
        &self.relayer
    }

    /// Decrypt the given handles for `holder`.
    ///
    /// Side effects: one wallet-signature prompt, one relayer round trip. No
    /// on-chain state is touched. Each attempt uses fresh key material and a
    /// fresh grant; nothing is reused from a failed attempt.
    pub async fn decrypt<W: HolderWallet + ?Sized>(
        &self,
        pairs: &[HandleContractPair],
        holder: Address,
        wallet: Option<&W>,
    ) -> ClientResult<DecryptionResult> {
        // Precondition order is fixed: relayer, handles, signer.
        let relayer = self.relayer.get().await?;

        if pairs.is_empty() || pairs.iter().any(|p| p.handle.is_zero()) {
            return Err(ClientError::NoHandleLoaded);
        }

        let wallet = wallet.ok_or_else(|| {
            ClientError::SignerUnavailable("no wallet connected for grant signing".to_string())
        })?;

        let keypair = DecryptionKeypair::generate();

        let mut contract_addresses: Vec<Address> = Vec::new();
        for pair in pairs {
            if !contract_addresses.contains(&pair.contract_address) {
                contract_addresses.push(pair.contract_address);
            }
        }

        let start_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let grant = AuthorizationGrant::new(
            keypair.public_bytes(),
            contract_addresses.clone(),
            start_timestamp,
            self.grant_duration_days,
        );

        let domain = decryption_domain(self.chain_id);
        let message = grant.typed_message();
        let signature = timeout(self.wallet_timeout, wallet.sign_grant(&domain, &message))
            .await
            .map_err(|_| ClientError::Timeout {
                operation: "grant signature",
                secs: self.wallet_timeout.as_secs(),
            })??;

        let request = UserDecryptRequest {
            handle_contract_pairs: pairs.to_vec(),
            private_key: keypair.secret_hex(),
            public_key: keypair.public_hex(),
            signature: alloy::hex::encode(signature.as_bytes()),
            contract_addresses,
            holder,
            start_timestamp,
            duration_days: self.grant_duration_days,
        };

        let response = timeout(self.relayer_timeout, relayer.user_decrypt(&request))
            .await
            .map_err(|_| ClientError::Timeout {
                operation: "relayer decrypt",
                secs: self.relayer_timeout.as_secs(),
            })??;

        let mut result = DecryptionResult::new();
        for pair in pairs {
            result.insert(pair.handle, response.plaintext_of(pair.handle)?);
        }

        tracing::debug!(handles = pairs.len(), holder = %holder, "decryption session completed");

        // `keypair` (and the request holding its hex copies) drops here on
        // every exit path; the secret is zeroized with it.
        Ok(result)
    }
}
