use async_trait::async_trait;
use kasen_core::alert::entity::{AlertAction, AlertTriggered};
use kasen_core::alert::error::AlertError;
use kasen_core::alert::port::AlertSink;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// # Summary
/// An alert sink that writes every triggered alert to the tracing log.
///
/// # Invariants
/// - Never fails; delivery is the log line itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    async fn deliver(&self, event: &AlertTriggered) -> Result<(), AlertError> {
        let alert = &event.alert;
        match alert.action {
            AlertAction::Sound => warn!(
                "\u{7}ALERT {} {:?} close {} at {} {}",
                alert.id, alert.kind, event.point.close, event.point.time, alert.note
            ),
            AlertAction::Notify => info!(
                "ALERT {} {:?} close {} at {} {}",
                alert.id, alert.kind, event.point.close, event.point.time, alert.note
            ),
        }
        Ok(())
    }
}

/// # Summary
/// An alert sink that forwards events into an unbounded channel.
///
/// # Invariants
/// - Delivery fails once the receiving half has been dropped.
pub struct ChannelSink {
    /// The sending half of the event channel.
    tx: mpsc::UnboundedSender<AlertTriggered>,
}

impl ChannelSink {
    /// # Summary
    /// Creates a sink together with the receiver that observes its events.
    ///
    /// # Returns
    /// * The sink and the receiving half of the channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AlertTriggered>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl AlertSink for ChannelSink {
    async fn deliver(&self, event: &AlertTriggered) -> Result<(), AlertError> {
        self.tx
            .send(event.clone())
            .map_err(|e| AlertError::Delivery(format!("Receiver dropped: {}", e)))
    }
}
