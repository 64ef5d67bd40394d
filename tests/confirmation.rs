//! Confirmation wait behaviour against scripted nodes.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use token_info::blockchain::BlockchainError;
use token_info::{await_confirmation, Shutdown};

mod common;
use common::{confirmed, pending, rejected, ScriptedNode, StalledNode, Step};

#[tokio::test]
async fn test_returns_nth_confirmation_after_n_queries() {
    for n in 1..=5u64 {
        let mut steps: Vec<Step> = (1..n).map(|_| pending()).collect();
        steps.push(confirmed(1000 + n));
        let node = ScriptedNode::new(1000, steps);

        let round = await_confirmation(&node, "TXN", 10, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(round, 1000 + n);
        assert_eq!(node.queried_at().len() as u64, n);
    }
}

#[tokio::test]
async fn test_scenario_confirms_at_round_102() {
    let node = ScriptedNode::new(100, vec![pending(), pending(), confirmed(102)]);
    let round = await_confirmation(&node, "TXN", 4, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(round, 102);
    assert_eq!(node.queried_at(), vec![100, 101, 102]);
    assert_eq!(node.waits(), vec![100, 101]);
}

#[tokio::test]
async fn test_scenario_times_out_after_two_rounds() {
    let node = ScriptedNode::new(50, vec![pending()]);
    let err = await_confirmation(&node, "TXN", 2, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        BlockchainError::ConfirmationTimeout { tx_id, rounds } => {
            assert_eq!(tx_id, "TXN");
            assert_eq!(rounds, 2);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(node.queried_at(), vec![50, 51, 52]);
}

#[tokio::test]
async fn test_query_count_bounded_by_budget() {
    for max_rounds in 0..6u64 {
        let node = ScriptedNode::new(10, vec![]);
        let result = await_confirmation(&node, "TXN", max_rounds, &CancellationToken::new()).await;
        assert!(matches!(result, Err(BlockchainError::ConfirmationTimeout { .. })));
        assert_eq!(node.queried_at().len() as u64, max_rounds + 1);
    }
}

#[tokio::test]
async fn test_zero_budget_with_immediate_confirmation() {
    let node = ScriptedNode::new(9, vec![confirmed(9)]);
    let round = await_confirmation(&node, "TXN", 0, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(round, 9);
    assert!(node.waits().is_empty());
}

#[tokio::test]
async fn test_rejection_before_confirmation() {
    let node = ScriptedNode::new(
        20,
        vec![pending(), rejected("TransactionPool.Remember: fee too small"), confirmed(22)],
    );
    let err = await_confirmation(&node, "TXN", 4, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BlockchainError::TransactionRejected { ref message, .. } if message.contains("fee too small")));
    assert_eq!(node.queried_at(), vec![20, 21]);
}

#[tokio::test]
async fn test_confirmation_wins_over_pool_error() {
    let both = Step::Pending(token_info::blockchain::PendingStatus {
        confirmed_round: Some(31),
        pool_error: Some("stale".into()),
        ..Default::default()
    });
    let node = ScriptedNode::new(30, vec![both]);
    let round = await_confirmation(&node, "TXN", 4, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(round, 31);
}

#[tokio::test]
async fn test_idempotent_on_confirmed_transaction() {
    let node = ScriptedNode::new(500, vec![confirmed(480)]);
    let cancel = CancellationToken::new();
    let first = await_confirmation(&node, "TXN", 4, &cancel).await.unwrap();
    let second = await_confirmation(&node, "TXN", 4, &cancel).await.unwrap();
    assert_eq!(first, 480);
    assert_eq!(second, 480);
}

#[tokio::test]
async fn test_transport_error_passes_through() {
    let node = ScriptedNode::new(5, vec![pending(), Step::Fail("connection reset".into())]);
    let err = await_confirmation(&node, "TXN", 4, &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        BlockchainError::Rpc(message) => assert_eq!(message, "connection reset"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_token_stops_at_first_round_wait() {
    let node = ScriptedNode::new(10, vec![pending()]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = await_confirmation(&node, "TXN", 4, &cancel).await.unwrap_err();
    assert!(matches!(err, BlockchainError::Cancelled(ref id) if id == "TXN"));
    // The pending query at the baseline still runs; no round wait follows.
    assert_eq!(node.queried_at(), vec![10]);
    assert!(node.waits().is_empty());
}

#[tokio::test]
async fn test_deadline_cancels_stalled_wait() {
    let shutdown = Shutdown::new();
    shutdown.trigger_after(Duration::from_millis(50));

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        await_confirmation(&StalledNode, "TXN", 4, &shutdown.token()),
    )
    .await
    .expect("wait should end once the deadline cancels it");

    assert!(matches!(result, Err(BlockchainError::Cancelled(ref id)) if id == "TXN"));
}
