//! Decryption session types: ephemeral key material, the authorization grant,
//! and the relayer wire format.

use std::collections::HashMap;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::{eip712_domain, Eip712Domain};
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};

use crate::chain::types::EncryptedHandle;
use crate::error::{ClientError, ClientResult};

sol! {
    /// EIP-712 message the holder signs to authorize a decryption session.
    /// The signed payload is human-reviewable in a compliant wallet, never a
    /// raw hash.
    #[derive(Debug)]
    struct UserDecryptRequestVerification {
        bytes publicKey;
        address[] contractAddresses;
        uint256 startTimestamp;
        uint256 durationDays;
    }
}

/// Domain separator for decryption grants on the given chain.
pub fn decryption_domain(chain_id: u64) -> Eip712Domain {
    eip712_domain! {
        name: "Decryption",
        version: "1",
        chain_id: chain_id,
    }
}

/// Ephemeral keypair scoped to a single decryption call.
///
/// The secret must never be reused across calls: reuse would let a leaked
/// grant be replayed against future handles. `StaticSecret` zeroizes itself
/// on drop, so dropping the keypair is the discard step.
pub struct DecryptionKeypair {
    secret: StaticSecret,
    public: PublicKey,
}

impl DecryptionKeypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(&mut rand::thread_rng());
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Public half, as raw bytes for the grant message.
    pub fn public_bytes(&self) -> [u8; 32] {
        self.public.to_bytes()
    }

    /// Public half, hex encoded for the relayer request.
    pub fn public_hex(&self) -> String {
        alloy::hex::encode(self.public.to_bytes())
    }

    /// Secret half, hex encoded for the relayer request. Callers must not
    /// persist this beyond the request they are building.
    pub fn secret_hex(&self) -> String {
        alloy::hex::encode(self.secret.to_bytes())
    }
}

impl std::fmt::Debug for DecryptionKeypair {
    // Never expose the secret half, even in debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptionKeypair")
            .field("public", &alloy::hex::encode(self.public.to_bytes()))
            .finish_non_exhaustive()
    }
}

/// Time-bounded, holder-signed statement authorizing the relayer to release
/// plaintext for specific contracts to the holder of an ephemeral key.
#[derive(Debug, Clone)]
pub struct AuthorizationGrant {
    /// Ephemeral public key the plaintext will be released to.
    pub public_key: Bytes,
    /// Exact contract addresses whose handles are being decrypted. The
    /// relayer refuses grants that do not name them.
    pub contract_addresses: Vec<Address>,
    /// Grant validity start, unix seconds.
    pub start_timestamp: u64,
    /// Grant validity window in days.
    pub duration_days: u64,
}

impl AuthorizationGrant {
    pub fn new(
        public_key: [u8; 32],
        contract_addresses: Vec<Address>,
        start_timestamp: u64,
        duration_days: u64,
    ) -> Self {
        Self {
            public_key: Bytes::from(public_key.to_vec()),
            contract_addresses,
            start_timestamp,
            duration_days,
        }
    }

    /// The EIP-712 message for the holder to sign.
    pub fn typed_message(&self) -> UserDecryptRequestVerification {
        UserDecryptRequestVerification {
            publicKey: self.public_key.clone(),
            contractAddresses: self.contract_addresses.clone(),
            startTimestamp: U256::from(self.start_timestamp),
            durationDays: U256::from(self.duration_days),
        }
    }
}

/// One (handle, contract) pair to decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleContractPair {
    pub handle: EncryptedHandle,
    pub contract_address: Address,
}

/// Relayer user-decrypt request body.
///
/// Carries the ephemeral secret so the relayer can encrypt the released
/// plaintext to it; the request must be built, sent, and dropped within one
/// decryption call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptRequest {
    pub handle_contract_pairs: Vec<HandleContractPair>,
    pub private_key: String,
    pub public_key: String,
    /// Grant signature, hex without the 0x prefix.
    pub signature: String,
    pub contract_addresses: Vec<Address>,
    pub holder: Address,
    pub start_timestamp: u64,
    pub duration_days: u64,
}

/// Relayer response: plaintext keyed by handle, decimal-encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDecryptResponse {
    pub plaintexts: HashMap<EncryptedHandle, String>,
}

impl UserDecryptResponse {
    /// Plaintext for one handle, or `DecryptionIncomplete` if the relayer
    /// omitted it or returned a non-integer value.
    pub fn plaintext_of(&self, handle: EncryptedHandle) -> ClientResult<u64> {
        self.plaintexts
            .get(&handle)
            .and_then(|raw| raw.parse::<u64>().ok())
            .ok_or(ClientError::DecryptionIncomplete(handle))
    }
}

/// Plaintext values by handle, returned only for an authorized holder.
pub type DecryptionResult = HashMap<EncryptedHandle, u64>;
