//! Bridge client: timed delivery and balance reconciliation

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sl_payout::{JackpotPool, SessionState, SpinOutcome, SymbolTable};

use crate::payload::SpinReport;
use crate::transport::SyncTransport;

/// Bridge errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Host returned HTTP {0}")]
    Status(u16),

    #[error("Invalid host reply: {0}")]
    InvalidReply(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// How the host answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Acknowledged,
    Rejected { reason: String },
    TimedOut,
}

impl SyncOutcome {
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::Acknowledged)
    }
}

/// Bridge settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Player identifier stamped on every report
    pub user_id: String,
    /// Per-delivery timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Everything a spin can move: the player's session and the shared jackpot
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub state: SessionState,
    pub pool: Option<JackpotPool>,
}

impl Checkpoint {
    pub fn new(state: SessionState, pool: Option<JackpotPool>) -> Self {
        Self { state, pool }
    }

    /// Session without a jackpot
    pub fn session(state: SessionState) -> Self {
        Self { state, pool: None }
    }
}

/// A locally settled spin not yet confirmed by the host
#[derive(Debug, Clone)]
pub struct PendingSpin {
    pub before: Checkpoint,
    pub after: Checkpoint,
    pub report: SpinReport,
}

impl PendingSpin {
    pub fn new(
        user_id: impl Into<String>,
        before: Checkpoint,
        after: Checkpoint,
        outcome: &SpinOutcome,
        table: &SymbolTable,
    ) -> Self {
        Self {
            report: SpinReport::from_outcome(user_id, outcome, table),
            before,
            after,
        }
    }

    /// Checkpoint to keep: the settled one only when the host acknowledged
    ///
    /// Both the session and the jackpot pool roll back together, so an
    /// unconfirmed award stays in the pool.
    pub fn reconcile(self, outcome: &SyncOutcome) -> Checkpoint {
        if outcome.is_acknowledged() {
            self.after
        } else {
            self.before
        }
    }
}

/// Host bridge client
pub struct BridgeClient<T: SyncTransport> {
    transport: T,
    config: BridgeConfig,
}

impl<T: SyncTransport> BridgeClient<T> {
    pub fn new(transport: T, config: BridgeConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Wrap a settled spin for delivery, stamped with the configured user
    pub fn pending(
        &self,
        before: Checkpoint,
        after: Checkpoint,
        outcome: &SpinOutcome,
        table: &SymbolTable,
    ) -> PendingSpin {
        PendingSpin::new(self.config.user_id.clone(), before, after, outcome, table)
    }

    /// Deliver one report, bounded by the configured timeout
    pub async fn sync(&self, report: &SpinReport) -> Result<SyncOutcome, SyncError> {
        let timeout = Duration::from_millis(self.config.timeout_ms as u64);

        match tokio::time::timeout(timeout, self.transport.deliver(report)).await {
            Err(_) => {
                log::warn!(
                    "[Bridge] report for user {} timed out after {}ms",
                    report.user_id,
                    self.config.timeout_ms
                );
                Ok(SyncOutcome::TimedOut)
            }
            Ok(Err(e)) => {
                log::error!("[Bridge] delivery failed: {}", e);
                Err(e)
            }
            Ok(Ok(ack)) if ack.accepted => {
                log::debug!("[Bridge] report acknowledged");
                Ok(SyncOutcome::Acknowledged)
            }
            Ok(Ok(ack)) => {
                let reason = ack.reason.unwrap_or_else(|| "unspecified".to_string());
                log::warn!("[Bridge] report rejected: {}", reason);
                Ok(SyncOutcome::Rejected { reason })
            }
        }
    }

    /// Deliver a pending spin and return the checkpoint to carry forward
    ///
    /// Anything short of an acknowledgement, transport errors included,
    /// keeps the pre-spin checkpoint.
    pub async fn commit(&self, pending: PendingSpin) -> (Checkpoint, Result<SyncOutcome, SyncError>) {
        let result = self.sync(&pending.report).await;
        let state = match &result {
            Ok(outcome) => pending.reconcile(outcome),
            Err(_) => pending.before,
        };
        (state, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::DeliveryAck;
    use crate::transport::ChannelTransport;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sl_payout::{GameConfig, JackpotConfig, PayoutEngine, play_spin};

    fn classic() -> PayoutEngine {
        PayoutEngine::from_config(GameConfig::classic()).unwrap()
    }

    fn pending() -> PendingSpin {
        let engine = classic();
        let before = SessionState::new(1000, 10);
        let (after, outcome) =
            play_spin(&before, &engine, None, &mut StdRng::seed_from_u64(12)).unwrap();
        PendingSpin::new(
            "u1",
            Checkpoint::session(before),
            Checkpoint::session(after),
            &outcome,
            engine.symbol_table(),
        )
    }

    /// Spin at bet 100 against a 🍒 jackpot pool
    fn pending_with_pool(chance: f64) -> PendingSpin {
        let engine = classic();
        let mut pool = JackpotPool::new(JackpotConfig {
            chance,
            ..JackpotConfig::new(1)
        });
        let before = Checkpoint::new(SessionState::new(1000, 100), Some(pool.clone()));
        let (after, outcome) = play_spin(
            &before.state,
            &engine,
            Some(&mut pool),
            &mut StdRng::seed_from_u64(12),
        )
        .unwrap();
        PendingSpin::new(
            "u1",
            before,
            Checkpoint::new(after, Some(pool)),
            &outcome,
            engine.symbol_table(),
        )
    }

    fn client(timeout_ms: u32) -> (BridgeClient<ChannelTransport>, tokio::sync::mpsc::Receiver<crate::Delivery>) {
        let (transport, rx) = ChannelTransport::pair(8);
        let config = BridgeConfig {
            user_id: "u1".into(),
            timeout_ms,
        };
        (BridgeClient::new(transport, config), rx)
    }

    #[tokio::test]
    async fn test_acknowledged_keeps_settled_state() {
        let (client, mut rx) = client(1000);
        tokio::spawn(async move {
            while let Some(delivery) = rx.recv().await {
                delivery.respond(DeliveryAck::accepted());
            }
        });

        let pending = pending();
        let after = pending.after.clone();
        let (state, result) = client.commit(pending).await;
        assert_eq!(result, Ok(SyncOutcome::Acknowledged));
        assert_eq!(state, after);
    }

    #[tokio::test]
    async fn test_rejected_spin_restores_jackpot_pool() {
        let (client, mut rx) = client(1000);
        tokio::spawn(async move {
            while let Some(delivery) = rx.recv().await {
                delivery.respond(DeliveryAck::rejected("duplicate"));
            }
        });

        let pending = pending_with_pool(0.0);
        let pool_before = pending.before.pool.clone().unwrap();
        // 1% of the 100 stake was taken locally
        assert_eq!(pending.after.pool.as_ref().unwrap().amount(), 5000 + 1);
        assert_eq!(pool_before.amount(), 5000);

        let (kept, result) = client.commit(pending).await;
        assert!(matches!(result, Ok(SyncOutcome::Rejected { .. })));
        assert_eq!(kept.pool, Some(pool_before));
        assert_eq!(kept.state.balance, 1000);
    }

    #[tokio::test]
    async fn test_acknowledged_spin_keeps_pool_change() {
        let (client, mut rx) = client(1000);
        tokio::spawn(async move {
            while let Some(delivery) = rx.recv().await {
                delivery.respond(DeliveryAck::accepted());
            }
        });

        let pending = pending_with_pool(0.0);
        let (kept, _) = client.commit(pending).await;
        assert_eq!(kept.pool.unwrap().amount(), 5001);
    }

    #[tokio::test]
    async fn test_unconfirmed_award_stays_in_pool() {
        let (client, rx) = client(1000);
        drop(rx);

        let engine = classic();
        let mut pool = JackpotPool::new(JackpotConfig {
            chance: 1.0,
            ..JackpotConfig::new(1)
        });
        let before = Checkpoint::new(SessionState::new(1000, 10), Some(pool.clone()));

        // Spin until 🍒🍒🍒 lands and the pool pays out
        let mut rng = StdRng::seed_from_u64(40);
        let (after, outcome) = loop {
            let (after, outcome) =
                play_spin(&before.state, &engine, Some(&mut pool), &mut rng).unwrap();
            if outcome.jackpot_award.is_some() {
                break (after, outcome);
            }
            pool = before.pool.clone().unwrap();
        };
        assert_eq!(outcome.jackpot_award, Some(5000));

        let pending = client.pending(
            before.clone(),
            Checkpoint::new(after, Some(pool)),
            &outcome,
            engine.symbol_table(),
        );
        assert_eq!(pending.report.user_id, "u1");

        let (kept, result) = client.commit(pending).await;
        assert!(result.is_err());
        assert_eq!(kept, before);
        assert_eq!(kept.pool.unwrap().awards(), 0);
    }

    #[tokio::test]
    async fn test_rejected_keeps_pre_spin_state() {
        let (client, mut rx) = client(1000);
        tokio::spawn(async move {
            while let Some(delivery) = rx.recv().await {
                delivery.respond(DeliveryAck::rejected("stale balance"));
            }
        });

        let pending = pending();
        let before = pending.before.clone();
        let (state, result) = client.commit(pending).await;
        assert_eq!(
            result,
            Ok(SyncOutcome::Rejected {
                reason: "stale balance".into()
            })
        );
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_timeout_keeps_pre_spin_state() {
        let (client, mut rx) = client(20);
        // Host holds the report without answering
        let host = tokio::spawn(async move {
            let held = rx.recv().await;
            tokio::time::sleep(Duration::from_millis(200)).await;
            drop(held);
        });

        let pending = pending();
        let before = pending.before.clone();
        let (state, result) = client.commit(pending).await;
        assert_eq!(result, Ok(SyncOutcome::TimedOut));
        assert_eq!(state, before);
        host.await.unwrap();
    }

    #[tokio::test]
    async fn test_transport_error_keeps_pre_spin_state() {
        let (client, rx) = client(1000);
        drop(rx);

        let pending = pending();
        let before = pending.before.clone();
        let (state, result) = client.commit(pending).await;
        assert!(matches!(result, Err(SyncError::Transport(_))));
        assert_eq!(state, before);
    }
}
