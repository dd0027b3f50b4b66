//! End-to-end session scenarios over in-memory fakes.

mod common;

use std::sync::atomic::Ordering;

use czama_client::error::ClientError;
use czama_client::OpStatus;

use common::{rate_quote, session, ChainState};

const THOUSAND_CZAMA_UNITS: u64 = 1000 * 1_000_000;

#[tokio::test]
async fn quote_one_eth_is_thousand_czama() {
    let state = ChainState::new();
    let (mut session, _, _) = session(state.clone()).await;

    let units = session.refresh_quote("1").await.unwrap();
    assert_eq!(units, THOUSAND_CZAMA_UNITS);
    assert!(matches!(session.quote_status(), OpStatus::Ready(_)));

    // Pure read: the chain state did not move.
    assert_eq!(state.lock().unwrap().swaps, 0);
}

#[tokio::test]
async fn malformed_amount_quotes_fail_without_network_call() {
    let state = ChainState::new();
    let (mut session, _, chain) = session(state).await;

    for bad in ["abc", "-1", ""] {
        let result = session.refresh_quote(bad).await;
        assert!(
            matches!(result, Err(ClientError::InvalidAmount(_))),
            "expected InvalidAmount for {:?}",
            bad
        );
    }
    assert_eq!(chain.quote_calls.load(Ordering::SeqCst), 0);
    assert!(matches!(session.quote_status(), OpStatus::Failed(_)));
}

#[tokio::test]
async fn zero_output_swap_reverts_and_leaves_handle_unchanged() {
    let state = ChainState::new();
    let (mut session, _, _) = session(state.clone()).await;

    let before = session.refresh_balance().await.unwrap();
    let result = session.swap("0", None).await;

    match result {
        Err(ClientError::SwapReverted(reason)) => assert!(reason.contains("CZamaSwapZeroOutput")),
        other => panic!("expected zero-output revert, got {:?}", other),
    }
    assert_eq!(state.lock().unwrap().handle, before);
    assert_eq!(session.balance_handle(), Some(before));
}

#[tokio::test]
async fn confirmed_swap_refreshes_handle_and_clears_stale_plaintext() {
    let state = ChainState::new();
    let (mut session, _, _) = session(state).await;

    // Zero handle means no balance recorded; decrypt resolves to 0 locally.
    let before = session.refresh_balance().await.unwrap();
    assert!(before.is_zero());
    assert_eq!(session.decrypt_balance().await.unwrap(), Some(0));
    assert!(matches!(session.decrypted_status(), OpStatus::Ready(0)));

    let receipt = session.swap("1", None).await.unwrap();
    assert_eq!(receipt.block_number, 1);

    // Freshness: the handle changed and the old plaintext was cleared.
    let after = session.balance_handle().unwrap();
    assert_ne!(after, before);
    assert!(matches!(session.decrypted_status(), OpStatus::Idle));
}

#[tokio::test]
async fn swap_then_decrypt_returns_minted_units() {
    let state = ChainState::new();
    let (mut session, relayer, _) = session(state).await;

    session.refresh_balance().await.unwrap();
    session.swap("1", None).await.unwrap();

    let units = session.decrypt_balance().await.unwrap();
    assert_eq!(units, Some(THOUSAND_CZAMA_UNITS));
    assert_eq!(session.decrypted_units(), Some(THOUSAND_CZAMA_UNITS));

    let relayer = relayer.get().await.unwrap();
    assert_eq!(relayer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_decrypts_agree_for_an_unchanged_handle() {
    let state = ChainState::new();
    let (mut session, relayer, _) = session(state).await;

    session.refresh_balance().await.unwrap();
    session.swap("2", None).await.unwrap();

    let first = session.decrypt_balance().await.unwrap();
    let second = session.decrypt_balance().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Some(2 * THOUSAND_CZAMA_UNITS));

    // Two round trips, each with its own keypair and grant (key freshness is
    // asserted per-request in the session unit tests).
    let relayer = relayer.get().await.unwrap();
    assert_eq!(relayer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn decrypt_before_balance_load_never_contacts_relayer() {
    let state = ChainState::new();
    let (mut session, relayer, _) = session(state).await;

    let result = session.decrypt_balance().await;
    assert!(matches!(result, Err(ClientError::NoHandleLoaded)));

    let relayer = relayer.get().await.unwrap();
    assert_eq!(relayer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_decrypt_keeps_the_loaded_balance() {
    let state = ChainState::new();
    let (mut session, _, _) = session(state.clone()).await;

    session.refresh_balance().await.unwrap();
    session.swap("1", None).await.unwrap();
    let handle = session.balance_handle().unwrap();

    // Relayer loses the plaintext for this handle.
    state.lock().unwrap().plaintexts.clear();

    let result = session.decrypt_balance().await;
    assert!(matches!(result, Err(ClientError::DecryptionIncomplete(_))));
    assert!(matches!(session.decrypted_status(), OpStatus::Failed(_)));

    // The failure is scoped: the balance slot still holds the handle.
    assert_eq!(session.balance_handle(), Some(handle));
}

#[tokio::test]
async fn handle_change_clears_plaintext_across_a_failed_reload() {
    let state = ChainState::new();
    let (mut session, _, chain) = session(state).await;

    session.refresh_balance().await.unwrap();
    session.swap("1", None).await.unwrap();
    assert_eq!(
        session.decrypt_balance().await.unwrap(),
        Some(THOUSAND_CZAMA_UNITS)
    );

    // The next swap confirms but its post-swap reload fails transiently.
    chain.read_failures.fetch_add(1, Ordering::SeqCst);
    session.swap("1", None).await.unwrap();
    assert!(matches!(session.balance_status(), OpStatus::Failed(_)));

    // A retried reload sees the new handle and must still clear the
    // plaintext decrypted under the superseded one.
    session.refresh_balance().await.unwrap();
    assert!(matches!(session.decrypted_status(), OpStatus::Idle));
    assert_eq!(session.decrypted_units(), None);
}

#[tokio::test]
async fn accumulates_across_swaps() {
    let state = ChainState::new();
    let (mut session, _, _) = session(state).await;

    session.refresh_balance().await.unwrap();
    session.swap("1", None).await.unwrap();
    session.swap("0.5", None).await.unwrap();

    let units = session.decrypt_balance().await.unwrap().unwrap();
    assert_eq!(units, THOUSAND_CZAMA_UNITS + THOUSAND_CZAMA_UNITS / 2);
}

#[test]
fn fixed_rate_scales_to_six_decimals() {
    use alloy::primitives::U256;
    assert_eq!(rate_quote(U256::from(10u128.pow(18))), THOUSAND_CZAMA_UNITS);
    assert_eq!(rate_quote(U256::from(10u128.pow(9)) - U256::from(1)), 0);
    assert_eq!(rate_quote(U256::ZERO), 0);
}
