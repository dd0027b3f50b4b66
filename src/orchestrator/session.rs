//! Per-user swap session.
//!
//! Sequences quote → submit → re-read balance → decrypt, with one
//! independent status slot per concern. All failures land in the relevant
//! slot as session-visible status; nothing propagates as an uncaught fault
//! and nothing retries automatically.

use alloy::primitives::Address;

use crate::chain::reader::ChainReads;
use crate::chain::submitter::{parse_eth_amount, SwapSubmits};
use crate::chain::types::{EncryptedHandle, SwapReceipt};
use crate::chain::wallet::HolderWallet;
use crate::error::{ClientError, ClientResult};
use crate::orchestrator::status::{OpSlot, OpStatus};
use crate::relayer::client::RelayerApi;
use crate::relayer::session::DecryptionClient;
use crate::relayer::types::HandleContractPair;

/// One user's swap-and-decrypt session.
///
/// Exclusive (`&mut`) access gives the single logical thread of control:
/// operations suspend cooperatively and the slot guards reject any overlap
/// that reaches them anyway.
pub struct SwapSession<C, S, R, W> {
    chain: C,
    submitter: S,
    decryptor: DecryptionClient<R>,
    wallet: Option<W>,
    holder: Address,
    token_address: Address,

    quote: OpSlot<u64>,
    balance: OpSlot<EncryptedHandle>,
    swap: OpSlot<SwapReceipt>,
    decrypted: OpSlot<u64>,
    /// Last handle any successful reload observed. Kept outside the balance
    /// slot: a failed reload moves the slot to `Failed` and drops its value,
    /// and this baseline must survive that to detect a later handle change.
    last_handle: Option<EncryptedHandle>,
}

impl<C, S, R, W> SwapSession<C, S, R, W>
where
    C: ChainReads,
    S: SwapSubmits,
    R: RelayerApi,
    W: HolderWallet,
{
    pub fn new(
        chain: C,
        submitter: S,
        decryptor: DecryptionClient<R>,
        wallet: Option<W>,
        holder: Address,
        token_address: Address,
    ) -> Self {
        Self {
            chain,
            submitter,
            decryptor,
            wallet,
            holder,
            token_address,
            quote: OpSlot::new(),
            balance: OpSlot::new(),
            swap: OpSlot::new(),
            decrypted: OpSlot::new(),
            last_handle: None,
        }
    }

    pub fn quote_status(&self) -> &OpStatus<u64> {
        self.quote.status()
    }

    pub fn balance_status(&self) -> &OpStatus<EncryptedHandle> {
        self.balance.status()
    }

    pub fn swap_status(&self) -> &OpStatus<SwapReceipt> {
        self.swap.status()
    }

    pub fn decrypted_status(&self) -> &OpStatus<u64> {
        self.decrypted.status()
    }

    /// Latest loaded balance handle, if the balance slot is `Ready`.
    pub fn balance_handle(&self) -> Option<EncryptedHandle> {
        self.balance.value().copied()
    }

    /// Latest decrypted balance in token units, if any.
    pub fn decrypted_units(&self) -> Option<u64> {
        self.decrypted.value().copied()
    }

    /// Re-quote the swap output for a new input amount.
    ///
    /// Malformed input fails with `InvalidAmount` before any network call.
    pub async fn refresh_quote(&mut self, amount_eth: &str) -> ClientResult<u64> {
        let token = self.quote.begin("quote")?;

        let result = match parse_eth_amount(amount_eth) {
            Ok(wei) => self.chain.quote(wei).await,
            Err(e) => Err(e),
        };

        self.quote.complete(token, &result);
        result
    }

    /// Reload the holder's encrypted balance handle.
    ///
    /// A previously decrypted value is cleared only when the reloaded handle
    /// actually differs. A failed reload leaves the old plaintext in place
    /// and keeps the comparison baseline, so a later successful reload still
    /// notices the change.
    pub async fn refresh_balance(&mut self) -> ClientResult<EncryptedHandle> {
        let token = self.balance.begin("balance")?;

        let result = self.chain.balance_handle(self.holder).await;

        if let Ok(new_handle) = &result {
            if self.last_handle.is_some() && self.last_handle != Some(*new_handle) {
                tracing::debug!(handle = %new_handle, "balance handle changed, clearing stale plaintext");
                self.decrypted.invalidate();
            }
            self.last_handle = Some(*new_handle);
        }

        self.balance.complete(token, &result);
        result
    }

    /// Swap `amount_eth` for confidential units and wait for confirmation.
    ///
    /// On confirmation the balance handle is stale, so a reload is triggered
    /// (which in turn clears the stale decrypted value). A reverted swap does
    /// NOT touch the loaded balance or a prior decrypted value.
    pub async fn swap(
        &mut self,
        amount_eth: &str,
        recipient: Option<Address>,
    ) -> ClientResult<SwapReceipt> {
        let token = self.swap.begin("swap")?;

        let result = self.submitter.submit_swap(amount_eth, recipient).await;
        self.swap.complete(token, &result);

        if result.is_ok() {
            if let Err(e) = self.refresh_balance().await {
                tracing::warn!(error = %e, "post-swap balance reload failed");
            }
        }

        result
    }

    /// Decrypt the loaded balance handle.
    ///
    /// Only enterable once the balance is `Ready`. A zero handle means no
    /// confidential balance was ever recorded and resolves to 0 without a
    /// relayer round trip. Returns `Ok(None)` when the handle changed while
    /// the decrypt was in flight: the stale plaintext is discarded rather
    /// than shown.
    pub async fn decrypt_balance(&mut self) -> ClientResult<Option<u64>> {
        let handle = match self.balance.value() {
            Some(handle) => *handle,
            None => return Err(ClientError::NoHandleLoaded),
        };
        let balance_generation = self.balance.generation();
        let token = self.decrypted.begin("decrypt")?;

        if handle.is_zero() {
            let result = Ok(0);
            self.decrypted.complete(token, &result);
            return Ok(Some(0));
        }

        let pairs = [HandleContractPair {
            handle,
            contract_address: self.token_address,
        }];
        let result = self
            .decryptor
            .decrypt(&pairs, self.holder, self.wallet.as_ref())
            .await;

        // The handle was superseded while we were suspended; this plaintext
        // no longer corresponds to anything on chain.
        if self.balance.generation() != balance_generation {
            self.decrypted.invalidate();
            return Ok(None);
        }

        let result = result.and_then(|map| {
            map.get(&handle)
                .copied()
                .ok_or(ClientError::DecryptionIncomplete(handle))
        });

        self.decrypted.complete(token, &result);
        result.map(Some)
    }

    /// Shared relayer handle, for startup initialization and explicit reset.
    pub fn decryptor(&self) -> &DecryptionClient<R> {
        &self.decryptor
    }
}
