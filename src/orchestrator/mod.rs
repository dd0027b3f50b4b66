//! Swap session orchestration.
//!
//! # State Machines (one per concern, independent)
//! ```text
//! Quote:   Idle → InFlight → {Ready | Failed}   re-entered per input change
//! Balance: Idle → InFlight → {Ready | Failed}
//! Swap:    Idle → InFlight → {Ready | Failed}   Ready triggers balance reload
//! Decrypt: Idle → InFlight → {Ready | Failed}   gated on Balance Ready
//! ```

pub mod session;
pub mod status;

pub use session::SwapSession;
pub use status::{OpSlot, OpStatus};
