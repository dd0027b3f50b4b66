//! Chain-facing types and contract bindings.

use alloy::primitives::{Address, B256, TxHash};
use alloy::sol;
use serde::{Deserialize, Serialize};

sol! {
    /// Confidential token surface: balances are opaque ciphertext handles.
    #[sol(rpc)]
    interface IConfidentialToken {
        function confidentialBalanceOf(address account) external view returns (bytes32);
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }

    /// Fixed-rate ETH -> confidential token swap.
    #[sol(rpc)]
    interface ICZamaSwap {
        error CZamaSwapZeroOutput();

        function quote(uint256 ethInWei) external pure returns (uint64 czamaOutUnits);
        function swap() external payable returns (uint64 czamaOutUnits);
        function swap(address recipient) external payable returns (uint64 czamaOutUnits);
    }
}

/// Opaque 32-byte reference to a ciphertext stored by the confidential
/// contract. Identity only: not decodable without the relayer protocol. A new
/// transaction against the balance slot replaces the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedHandle(pub B256);

impl EncryptedHandle {
    /// The zero handle means no confidential balance has been recorded yet.
    /// It is not a decryptable ciphertext.
    pub fn is_zero(&self) -> bool {
        self.0 == B256::ZERO
    }
}

impl From<B256> for EncryptedHandle {
    fn from(raw: B256) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for EncryptedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a confirmed swap transaction. A failed or reverted swap is
/// reported once as an error, never as a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    /// Hash of the submitted transaction.
    pub tx_hash: TxHash,
    /// Block in which the transaction was confirmed.
    pub block_number: u64,
    /// Recipient of the minted confidential units.
    pub recipient: Address,
}
