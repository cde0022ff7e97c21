//! Backpressure strategies for a full mailbox (§3, §6).

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// Layer 3: Internal module imports
use super::traits::MailboxError;
use crate::message::Envelope;

/// Strategy applied when an enqueue would exceed the mailbox's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BackpressureStrategy {
    /// Wait asynchronously for space to free up.
    Block,

    /// Silently drop the incoming envelope.
    Drop,

    /// Reject immediately with `MailboxError::Full` (§7 `RejectedByMailbox`).
    #[default]
    Reject,
}

impl fmt::Display for BackpressureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => write!(f, "Block"),
            Self::Drop => write!(f, "Drop"),
            Self::Reject => write!(f, "Reject"),
        }
    }
}

impl BackpressureStrategy {
    /// Apply this strategy to enqueue `envelope` onto `sender`.
    pub async fn apply(
        &self,
        sender: &mpsc::Sender<Envelope>,
        envelope: Envelope,
    ) -> Result<(), MailboxError> {
        match self {
            Self::Block => sender.send(envelope).await.map_err(|_| MailboxError::Closed),

            Self::Drop => match sender.try_send(envelope) {
                Ok(()) => Ok(()),
                Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
                Err(mpsc::error::TrySendError::Closed(_)) => Err(MailboxError::Closed),
            },

            Self::Reject => sender.try_send(envelope).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => MailboxError::Full {
                    capacity: sender.max_capacity(),
                },
                mpsc::error::TrySendError::Closed(_) => MailboxError::Closed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{ActorKey, TypeId};

    fn envelope() -> Envelope {
        Envelope::request(ActorKey::new(TypeId::new("Counter"), "c1"), "inc", vec![])
    }

    #[test]
    fn default_strategy_is_reject() {
        assert_eq!(BackpressureStrategy::default(), BackpressureStrategy::Reject);
    }

    #[tokio::test]
    async fn reject_fails_when_full() {
        let (sender, _receiver) = mpsc::channel(1);
        sender.try_send(envelope()).unwrap();

        let result = BackpressureStrategy::Reject.apply(&sender, envelope()).await;
        assert!(matches!(result, Err(MailboxError::Full { .. })));
    }

    #[tokio::test]
    async fn drop_silently_discards_when_full() {
        let (sender, mut receiver) = mpsc::channel(1);
        sender.try_send(envelope()).unwrap();

        BackpressureStrategy::Drop.apply(&sender, envelope()).await.unwrap();
        receiver.recv().await.unwrap();
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn block_waits_for_space() {
        let (sender, mut receiver) = mpsc::channel(1);
        sender.try_send(envelope()).unwrap();

        let sender_clone = sender.clone();
        let handle = tokio::spawn(async move {
            BackpressureStrategy::Block.apply(&sender_clone, envelope()).await
        });

        receiver.recv().await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn closed_channel_is_an_error_for_every_strategy() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);

        for strategy in [
            BackpressureStrategy::Block,
            BackpressureStrategy::Drop,
            BackpressureStrategy::Reject,
        ] {
            let result = strategy.apply(&sender, envelope()).await;
            assert!(matches!(result, Err(MailboxError::Closed)));
        }
    }
}
