//! Shared fakes for integration testing: an in-memory chain with the fixed
//! 1 ETH = 1000 cZama rate (6 decimals) and a relayer that releases the
//! plaintext recorded for each handle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, TxHash, U256};
use async_trait::async_trait;

use czama_client::chain::{
    parse_eth_amount, ChainReads, EncryptedHandle, HolderWallet, LocalWallet, SwapReceipt,
    SwapSubmits,
};
use czama_client::config::RelayerConfig;
use czama_client::error::{ClientError, ClientResult};
use czama_client::relayer::{
    DecryptionClient, RelayerApi, RelayerHandle, UserDecryptRequest, UserDecryptResponse,
};
use czama_client::SwapSession;

/// Anvil's first well-known account.
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn token_address() -> Address {
    "0xc690a88373Bf0E788e3B53015b87A58AF7A31D5b".parse().unwrap()
}

/// Fixed-rate pricing: 1 ETH (1e18 wei) mints 1000 cZama at 6 decimals
/// (1e9 units), so units = wei / 1e9.
pub fn rate_quote(wei: U256) -> u64 {
    (wei / U256::from(1_000_000_000u64)).try_into().unwrap_or(u64::MAX)
}

/// Mutable chain state shared by the fake reader, submitter, and relayer.
pub struct ChainState {
    /// Current balance handle for the single test holder.
    pub handle: EncryptedHandle,
    /// Plaintext recorded per handle, as the relayer would release it.
    pub plaintexts: HashMap<EncryptedHandle, u64>,
    /// Running balance in token units.
    pub balance_units: u64,
    /// How many swaps have confirmed, used to derive fresh handles.
    pub swaps: u8,
}

impl ChainState {
    pub fn new() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            handle: EncryptedHandle(B256::ZERO),
            plaintexts: HashMap::new(),
            balance_units: 0,
            swaps: 0,
        }))
    }
}

#[derive(Clone)]
pub struct FakeChain {
    pub state: Arc<Mutex<ChainState>>,
    pub quote_calls: Arc<AtomicU32>,
    /// Pending transient balance-read failures, consumed one per read.
    pub read_failures: Arc<AtomicU32>,
}

impl FakeChain {
    pub fn new(state: Arc<Mutex<ChainState>>) -> Self {
        Self {
            state,
            quote_calls: Arc::new(AtomicU32::new(0)),
            read_failures: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl ChainReads for FakeChain {
    async fn balance_handle(&self, _account: Address) -> ClientResult<EncryptedHandle> {
        if self.read_failures.load(Ordering::SeqCst) > 0 {
            self.read_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(ClientError::NetworkReadFailed(
                "connection reset by peer".to_string(),
            ));
        }
        Ok(self.state.lock().unwrap().handle)
    }

    async fn quote(&self, amount_in_wei: U256) -> ClientResult<u64> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(rate_quote(amount_in_wei))
    }
}

#[derive(Clone)]
pub struct FakeSubmitter {
    pub state: Arc<Mutex<ChainState>>,
}

#[async_trait]
impl SwapSubmits for FakeSubmitter {
    async fn submit_swap(
        &self,
        amount_eth: &str,
        recipient: Option<Address>,
    ) -> ClientResult<SwapReceipt> {
        let wei = parse_eth_amount(amount_eth)?;
        let out_units = rate_quote(wei);
        if out_units == 0 {
            return Err(ClientError::SwapReverted(
                "CZamaSwapZeroOutput: computed output is zero".to_string(),
            ));
        }

        let mut state = self.state.lock().unwrap();
        state.swaps += 1;
        state.balance_units += out_units;
        // Every confirmed transfer replaces the holder's handle.
        let fresh = EncryptedHandle(B256::repeat_byte(state.swaps));
        state.handle = fresh;
        let units = state.balance_units;
        state.plaintexts.insert(fresh, units);

        Ok(SwapReceipt {
            tx_hash: TxHash::repeat_byte(state.swaps),
            block_number: state.swaps as u64,
            recipient: recipient.unwrap_or(Address::ZERO),
        })
    }
}

pub struct FakeRelayer {
    pub state: Arc<Mutex<ChainState>>,
    pub calls: AtomicU32,
}

#[async_trait]
impl RelayerApi for FakeRelayer {
    async fn user_decrypt(&self, request: &UserDecryptRequest) -> ClientResult<UserDecryptResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let state = self.state.lock().unwrap();
        let mut response = UserDecryptResponse::default();
        for pair in &request.handle_contract_pairs {
            if let Some(units) = state.plaintexts.get(&pair.handle) {
                response.plaintexts.insert(pair.handle, units.to_string());
            }
        }
        Ok(response)
    }
}

pub type TestSession = SwapSession<FakeChain, FakeSubmitter, FakeRelayer, LocalWallet>;

/// A fully wired session over shared fake state, plus the relayer handle for
/// asserting on request counts.
pub async fn session(
    state: Arc<Mutex<ChainState>>,
) -> (TestSession, Arc<RelayerHandle<FakeRelayer>>, FakeChain) {
    let wallet = LocalWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
    let holder = wallet.address();

    let chain = FakeChain::new(state.clone());
    let submitter = FakeSubmitter {
        state: state.clone(),
    };

    let relayer_handle = Arc::new(RelayerHandle::new());
    relayer_handle
        .get_or_init(async {
            Ok(FakeRelayer {
                state: state.clone(),
                calls: AtomicU32::new(0),
            })
        })
        .await
        .unwrap();

    let decryptor = DecryptionClient::new(
        relayer_handle.clone(),
        11155111,
        &RelayerConfig::default(),
    );

    let session = SwapSession::new(
        chain.clone(),
        submitter,
        decryptor,
        Some(wallet),
        holder,
        token_address(),
    );
    (session, relayer_handle, chain)
}
