//! Delivery transports: HTTP for production, channels for in-process hosts

use std::future::Future;

use tokio::sync::{mpsc, oneshot};

use crate::payload::{DeliveryAck, SpinReport};
use crate::sync::SyncError;

/// Something that can carry a report to the host and bring back its answer
pub trait SyncTransport: Send + Sync {
    fn deliver(
        &self,
        report: &SpinReport,
    ) -> impl Future<Output = Result<DeliveryAck, SyncError>> + Send;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// POSTs reports as JSON and reads a `DeliveryAck` back
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            auth_token: None,
        }
    }

    /// Send a bearer token with every report
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SyncTransport for HttpTransport {
    async fn deliver(&self, report: &SpinReport) -> Result<DeliveryAck, SyncError> {
        let mut request = self.client.post(&self.endpoint).json(report);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }

        response
            .json::<DeliveryAck>()
            .await
            .map_err(|e| SyncError::InvalidReply(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHANNEL
// ═══════════════════════════════════════════════════════════════════════════════

/// A report waiting for the in-process host to answer
#[derive(Debug)]
pub struct Delivery {
    pub report: SpinReport,
    reply: oneshot::Sender<DeliveryAck>,
}

impl Delivery {
    /// Answer the report; returns false if the sender stopped waiting
    pub fn respond(self, ack: DeliveryAck) -> bool {
        self.reply.send(ack).is_ok()
    }
}

/// Hands reports to a task holding the receiving end
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::Sender<Delivery>,
}

impl ChannelTransport {
    /// Transport plus the host-side receiver
    pub fn pair(capacity: usize) -> (Self, mpsc::Receiver<Delivery>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl SyncTransport for ChannelTransport {
    async fn deliver(&self, report: &SpinReport) -> Result<DeliveryAck, SyncError> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .send(Delivery {
                report: report.clone(),
                reply,
            })
            .await
            .map_err(|_| SyncError::Transport("host channel closed".into()))?;

        answer
            .await
            .map_err(|_| SyncError::Transport("host dropped the report".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{GAME_RESULT_EVENT, GameResult};

    fn report() -> SpinReport {
        SpinReport {
            event: GAME_RESULT_EVENT.into(),
            user_id: "1".into(),
            bet: 10,
            win: 0,
            result: GameResult::Loss,
            balance: 990,
            grid: vec!["🍒".into(), "🍋".into(), "🍊".into()],
            winning_cells: Vec::new(),
            jackpot: None,
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_channel_round_trip() {
        let (transport, mut rx) = ChannelTransport::pair(4);
        let host = tokio::spawn(async move {
            let delivery = rx.recv().await.unwrap();
            assert_eq!(delivery.report.user_id, "1");
            delivery.respond(DeliveryAck::accepted());
        });

        let ack = transport.deliver(&report()).await.unwrap();
        assert!(ack.accepted);
        host.await.unwrap();
    }

    #[tokio::test]
    async fn test_channel_closed() {
        let (transport, rx) = ChannelTransport::pair(1);
        drop(rx);
        assert!(matches!(
            transport.deliver(&report()).await,
            Err(SyncError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_host_drops_reply() {
        let (transport, mut rx) = ChannelTransport::pair(1);
        tokio::spawn(async move {
            let delivery = rx.recv().await.unwrap();
            drop(delivery);
        });
        assert!(matches!(
            transport.deliver(&report()).await,
            Err(SyncError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_http_unreachable() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let transport = HttpTransport::new("http://127.0.0.1:9/report");
        assert!(transport.deliver(&report()).await.is_err());
    }
}
