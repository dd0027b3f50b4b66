//! Per-operation status tracking.
//!
//! # States
//! ```text
//! Idle → InFlight → {Ready | Failed}
//! ```
//!
//! Each named operation (quote, balance, swap, decrypt) owns one slot, so a
//! failure in one concern never blocks the others. The slot enforces one
//! in-flight instance at a time and carries a generation counter so a stale
//! completion can never overwrite a newer result.

use crate::error::{ClientError, ClientResult};

/// Status of one named operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus<T> {
    /// Nothing attempted, or the last attempt was cleared.
    Idle,
    /// One instance is suspended on I/O.
    InFlight,
    /// Last attempt succeeded.
    Ready(T),
    /// Last attempt failed, with a human-readable reason. Returns to flight
    /// on the next user-initiated attempt.
    Failed(String),
}

/// One operation slot with overlap rejection and stale-completion discard.
#[derive(Debug)]
pub struct OpSlot<T> {
    status: OpStatus<T>,
    generation: u64,
}

impl<T: Clone> OpSlot<T> {
    pub fn new() -> Self {
        Self {
            status: OpStatus::Idle,
            generation: 0,
        }
    }

    pub fn status(&self) -> &OpStatus<T> {
        &self.status
    }

    /// Last successful value, if any.
    pub fn value(&self) -> Option<&T> {
        match &self.status {
            OpStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Generation of the current attempt or result. Bumped by `begin` and
    /// `invalidate`; a completion carrying an older token is discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new attempt. Rejects overlap: a second request while one is
    /// outstanding fails with `Busy` instead of racing it.
    pub fn begin(&mut self, name: &'static str) -> ClientResult<u64> {
        if matches!(self.status, OpStatus::InFlight) {
            return Err(ClientError::Busy(name));
        }
        self.generation += 1;
        self.status = OpStatus::InFlight;
        Ok(self.generation)
    }

    /// Record the outcome of the attempt started with `token`.
    ///
    /// Returns false (and leaves the slot untouched) when the slot has moved
    /// on since: the stale result is discarded without mutating state.
    pub fn complete(&mut self, token: u64, result: &ClientResult<T>) -> bool {
        if token != self.generation {
            return false;
        }
        self.status = match result {
            Ok(value) => OpStatus::Ready(value.clone()),
            Err(e) => OpStatus::Failed(e.to_string()),
        };
        true
    }

    /// Clear any result and supersede an in-flight attempt.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.status = OpStatus::Idle;
    }
}

impl<T: Clone> Default for OpSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_rejected() {
        let mut slot: OpSlot<u64> = OpSlot::new();
        let token = slot.begin("quote").unwrap();
        assert!(matches!(slot.begin("quote"), Err(ClientError::Busy("quote"))));

        assert!(slot.complete(token, &Ok(7)));
        assert_eq!(slot.value(), Some(&7));
        // Terminal states allow the next attempt.
        assert!(slot.begin("quote").is_ok());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut slot: OpSlot<u64> = OpSlot::new();
        let token = slot.begin("balance").unwrap();
        slot.invalidate();

        assert!(!slot.complete(token, &Ok(1)));
        assert!(matches!(slot.status(), OpStatus::Idle));
    }

    #[test]
    fn failure_is_recorded_with_reason() {
        let mut slot: OpSlot<u64> = OpSlot::new();
        let token = slot.begin("swap").unwrap();
        let result: ClientResult<u64> =
            Err(ClientError::SwapReverted("out of funds".to_string()));
        assert!(slot.complete(token, &result));

        match slot.status() {
            OpStatus::Failed(reason) => assert!(reason.contains("out of funds")),
            other => panic!("unexpected status {:?}", other),
        }
        assert_eq!(slot.value(), None);
    }
}
