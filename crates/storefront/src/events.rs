//! Broadcast notification that the signed-in shopper changed.
//!
//! Login and logout publish [`AuthChanged`]; anything holding shopper-scoped
//! state (the cart manager in particular) subscribes and re-resolves.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::debug;

use shopfront_core::ShopperKey;

/// Published after the persisted session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChanged {
    /// The shopper now in effect.
    pub shopper: ShopperKey,
}

/// Sending half of the auth-changed signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthChanged>,
}

impl AuthEvents {
    const CAPACITY: usize = 16;

    /// Create a new signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        Self { sender }
    }

    /// Notify every subscriber. Returns how many were listening.
    pub fn publish(&self, shopper: ShopperKey) -> usize {
        debug!(shopper = %shopper, "Publishing auth change");
        // No subscribers is fine: nothing to re-resolve.
        self.sender.send(AuthChanged { shopper }).unwrap_or(0)
    }

    /// Subscribe to future changes.
    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of the auth-changed signal.
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthChanged>,
}

impl AuthSubscription {
    /// Consume every pending notification without waiting.
    ///
    /// Returns `true` if at least one change was pending. A lagged receiver
    /// counts as changed since notifications were missed.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return changed,
            }
        }
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once every sender has been dropped.
    pub async fn changed(&mut self) -> Option<()> {
        match self.receiver.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) => Some(()),
            Err(RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use shopfront_core::CustomerId;

    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let events = AuthEvents::new();
        assert_eq!(events.publish(ShopperKey::Guest), 0);
    }

    #[test]
    fn test_drain_reports_pending_changes() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();
        assert!(!subscription.drain());

        events.publish(ShopperKey::Customer(CustomerId::new("gid://shopify/Customer/1")));
        events.publish(ShopperKey::Guest);
        assert!(subscription.drain());
        assert!(!subscription.drain());
    }

    #[test]
    fn test_lagged_subscription_counts_as_changed() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();
        for _ in 0..(AuthEvents::CAPACITY * 2) {
            events.publish(ShopperKey::Guest);
        }
        assert!(subscription.drain());
    }

    #[tokio::test]
    async fn test_changed_waits_for_publish() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();

        let publisher = events.clone();
        tokio::spawn(async move {
            publisher.publish(ShopperKey::Guest);
        });

        assert_eq!(subscription.changed().await, Some(()));
    }

    #[tokio::test]
    async fn test_changed_ends_when_senders_dropped() {
        let events = AuthEvents::new();
        let mut subscription = events.subscribe();
        drop(events);
        assert_eq!(subscription.changed().await, None);
    }
}
