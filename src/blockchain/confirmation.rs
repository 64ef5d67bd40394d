//! Transaction confirmation wait loop.
//!
//! Polls the pending pool once per ledger round until the transaction is
//! confirmed, rejected by the pool, or the round budget runs out. The budget
//! counts rounds, not seconds; wall-clock limits belong to the caller and are
//! applied through the cancellation token.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::blockchain::types::{BlockchainError, BlockchainResult, NodeStatus, PendingStatus};
use crate::observability::metrics;

/// Node queries needed to follow a submitted transaction.
#[async_trait]
pub trait NodeQuery: Send + Sync {
    /// Current node status; `last_round` is the baseline.
    async fn status(&self) -> BlockchainResult<NodeStatus>;

    /// Pending-pool view of `tx_id`.
    async fn pending_transaction_information(&self, tx_id: &str) -> BlockchainResult<PendingStatus>;

    /// Resolve once the node has a round past `round`.
    async fn wait_for_round_after(&self, round: u64) -> BlockchainResult<NodeStatus>;
}

/// Wait for `tx_id` to be confirmed, returning the confirmed round.
///
/// Confirmation is checked before the round budget, so `max_rounds = 0` still
/// succeeds on an already-confirmed transaction. Node errors are returned
/// as-is; nothing is retried here.
pub async fn await_confirmation<N>(
    node: &N,
    tx_id: &str,
    max_rounds: u64,
    cancel: &CancellationToken,
) -> BlockchainResult<u64>
where
    N: NodeQuery + ?Sized,
{
    let mut current_round = node.status().await?.last_round;
    let mut rounds_waited: u64 = 0;

    tracing::debug!(tx_id, baseline_round = current_round, max_rounds, "Waiting for confirmation");

    loop {
        let pending = node.pending_transaction_information(tx_id).await?;

        if let Some(round) = pending.confirmed() {
            tracing::info!(tx_id, confirmed_round = round, rounds_waited, "Transaction confirmed");
            metrics::record_confirmation("confirmed", rounds_waited);
            return Ok(round);
        }

        if let Some(message) = pending.rejection() {
            tracing::warn!(tx_id, pool_error = message, "Transaction rejected by pool");
            metrics::record_confirmation("rejected", rounds_waited);
            return Err(BlockchainError::TransactionRejected {
                tx_id: tx_id.to_string(),
                message: message.to_string(),
            });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!(tx_id, rounds_waited, "Confirmation wait cancelled");
                metrics::record_confirmation("cancelled", rounds_waited);
                return Err(BlockchainError::Cancelled(tx_id.to_string()));
            }
            result = node.wait_for_round_after(current_round) => {
                result?;
            }
        }
        current_round += 1;
        rounds_waited += 1;

        if rounds_waited > max_rounds {
            tracing::warn!(tx_id, max_rounds, "Transaction not confirmed within round budget");
            metrics::record_confirmation("timeout", rounds_waited);
            return Err(BlockchainError::ConfirmationTimeout {
                tx_id: tx_id.to_string(),
                rounds: max_rounds,
            });
        }

        tracing::debug!(tx_id, round = current_round, rounds_waited, "Transaction pending");
    }
}

