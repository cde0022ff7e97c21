//! Bounded, metrics-tracked mailbox backing one activation's turn queue.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::Utc; // §3.2 MANDATORY
use tokio::sync::mpsc;

// Layer 3: Internal module imports
use super::backpressure::BackpressureStrategy;
use super::metrics::{AtomicMetrics, MetricsRecorder};
use super::traits::{MailboxCapacity, MailboxError, MailboxReceiver, MailboxSender, TryRecvError};
use crate::message::Envelope;

/// Bounded mailbox: a fixed-capacity queue of [`Envelope`]s with a
/// configurable backpressure strategy and pluggable metrics recorder.
pub struct BoundedMailbox<R: MetricsRecorder = AtomicMetrics> {
    receiver: mpsc::Receiver<Envelope>,
    capacity: usize,
    pub metrics: Arc<R>,
}

/// Sender half of a [`BoundedMailbox`].
#[derive(Clone)]
pub struct BoundedMailboxSender<R: MetricsRecorder = AtomicMetrics> {
    sender: mpsc::Sender<Envelope>,
    backpressure_strategy: Arc<BackpressureStrategy>,
    capacity: usize,
    pub metrics: Arc<R>,
}

impl<R: MetricsRecorder> BoundedMailbox<R> {
    /// Create a mailbox with a custom metrics recorder and the default
    /// (`Reject`) backpressure strategy.
    pub fn with_metrics(capacity: usize, metrics: R) -> (Self, BoundedMailboxSender<R>) {
        Self::with_backpressure_and_metrics(capacity, BackpressureStrategy::Reject, metrics)
    }

    /// Create a mailbox with a custom backpressure strategy and metrics recorder.
    pub fn with_backpressure_and_metrics(
        capacity: usize,
        strategy: BackpressureStrategy,
        metrics: R,
    ) -> (Self, BoundedMailboxSender<R>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let metrics = Arc::new(metrics);

        let mailbox = Self {
            receiver,
            capacity,
            metrics: Arc::clone(&metrics),
        };
        let sender = BoundedMailboxSender {
            sender,
            backpressure_strategy: Arc::new(strategy),
            capacity,
            metrics,
        };
        (mailbox, sender)
    }
}

impl BoundedMailbox<AtomicMetrics> {
    /// Create a mailbox with the default backpressure strategy and
    /// `AtomicMetrics`.
    pub fn new(capacity: usize) -> (Self, BoundedMailboxSender<AtomicMetrics>) {
        Self::with_metrics(capacity, AtomicMetrics::new())
    }

    /// Create a mailbox with a custom backpressure strategy and `AtomicMetrics`.
    pub fn with_backpressure(
        capacity: usize,
        strategy: BackpressureStrategy,
    ) -> (Self, BoundedMailboxSender<AtomicMetrics>) {
        Self::with_backpressure_and_metrics(capacity, strategy, AtomicMetrics::new())
    }
}

#[async_trait]
impl<R: MetricsRecorder> MailboxReceiver for BoundedMailbox<R> {
    type Error = MailboxError;

    async fn recv(&mut self) -> Option<Envelope> {
        match self.receiver.recv().await {
            Some(envelope) => {
                if envelope.is_expired() {
                    self.metrics.record_dropped();
                    return Box::pin(self.recv()).await;
                }
                self.metrics.record_received();
                self.metrics.update_last_message(Utc::now()); // §3.2
                Some(envelope)
            }
            None => None,
        }
    }

    fn try_recv(&mut self) -> Result<Envelope, TryRecvError> {
        match self.receiver.try_recv() {
            Ok(envelope) => {
                if envelope.is_expired() {
                    self.metrics.record_dropped();
                    return self.try_recv();
                }
                self.metrics.record_received();
                self.metrics.update_last_message(Utc::now());
                Ok(envelope)
            }
            Err(mpsc::error::TryRecvError::Empty) => Err(TryRecvError::Empty),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(TryRecvError::Closed),
        }
    }

    fn capacity(&self) -> MailboxCapacity {
        MailboxCapacity::Bounded(self.capacity)
    }

    fn len(&self) -> usize {
        self.metrics.in_flight() as usize
    }
}

#[async_trait]
impl<R: MetricsRecorder> MailboxSender for BoundedMailboxSender<R> {
    type Error = MailboxError;

    async fn send(&self, envelope: Envelope) -> Result<(), Self::Error> {
        self.backpressure_strategy.apply(&self.sender, envelope).await?;
        self.metrics.record_sent();
        Ok(())
    }

    fn try_send(&self, envelope: Envelope) -> Result<(), Self::Error> {
        self.sender.try_send(envelope).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => MailboxError::Full {
                capacity: self.capacity,
            },
            mpsc::error::TrySendError::Closed(_) => MailboxError::Closed,
        })?;
        self.metrics.record_sent();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{ActorKey, TypeId};
    use std::time::Duration;

    fn envelope() -> Envelope {
        Envelope::request(ActorKey::new(TypeId::new("Counter"), "c1"), "inc", vec![1])
    }

    #[tokio::test]
    async fn creation_starts_empty() {
        let (mailbox, _sender) = BoundedMailbox::new(10);
        assert_eq!(mailbox.capacity(), MailboxCapacity::Bounded(10));
        assert!(mailbox.is_empty());
    }

    #[tokio::test]
    async fn send_then_receive_round_trips() {
        let (mut mailbox, sender) = BoundedMailbox::new(10);
        sender.send(envelope()).await.unwrap();
        let received = mailbox.recv().await.unwrap();
        assert_eq!(received.payload, vec![1]);
    }

    #[tokio::test]
    async fn capacity_enforced_with_reject_strategy() {
        let (_mailbox, sender) = BoundedMailbox::with_backpressure(1, BackpressureStrategy::Reject);
        sender.try_send(envelope()).unwrap();
        let result = sender.try_send(envelope());
        assert!(matches!(result, Err(MailboxError::Full { .. })));
    }

    #[tokio::test]
    async fn closed_mailbox_rejects_sends() {
        let (mailbox, sender) = BoundedMailbox::new(10);
        drop(mailbox);
        let result = sender.send(envelope()).await;
        assert!(matches!(result, Err(MailboxError::Closed)));
    }

    #[tokio::test]
    async fn expired_envelope_is_skipped_on_receive() {
        let (mut mailbox, sender) = BoundedMailbox::new(10);

        let expired = envelope().with_deadline(Duration::from_millis(0));
        tokio::time::sleep(Duration::from_millis(5)).await;
        sender.send(expired).await.unwrap();
        sender.send(envelope()).await.unwrap();

        let received = mailbox.recv().await.unwrap();
        assert!(!received.is_expired());
        assert_eq!(mailbox.metrics.dropped_count(), 1);
    }

    #[tokio::test]
    async fn metrics_track_sent_and_received() {
        let (mut mailbox, sender) = BoundedMailbox::new(10);
        sender.send(envelope()).await.unwrap();
        assert_eq!(mailbox.metrics.sent_count(), 1);
        mailbox.recv().await.unwrap();
        assert_eq!(mailbox.metrics.received_count(), 1);
    }
}
