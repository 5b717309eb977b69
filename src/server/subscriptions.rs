//! # Subscription Manager
//!
//! Tracks the clients holding an open realtime connection and fans out
//! new-image notifications to them.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! Connecting --register()--> Open --remote close / send failure--> Closed
//! ```
//!
//! Each open connection is represented by the sending half of an unbounded
//! channel. The WebSocket task owns the receiving half and forwards whatever
//! arrives to the socket. A broadcast therefore never waits on a slow client,
//! and a client whose task has ended shows up as a closed channel.
//!
//! Broadcast attempts delivery to every subscriber independently; failures are
//! logged and the dead handles pruned, without affecting the others.

use log::{debug, info, warn};
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Registry of open subscriber connections.
pub struct SubscriptionManager {
    /// Subscriber id -> channel feeding that subscriber's socket
    connections: RwLock<HashMap<Uuid, mpsc::UnboundedSender<String>>>,
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new subscriber.
    ///
    /// # Returns
    /// The subscriber id (for [`unregister`](Self::unregister)) and the
    /// receiver on which broadcast messages for this subscriber arrive.
    pub async fn register(&self) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        let count = {
            let mut connections = self.connections.write().await;
            connections.insert(id, tx);
            connections.len()
        };

        info!("🔌 Subscriber {} connected ({} active)", id, count);
        (id, rx)
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub async fn unregister(&self, id: &Uuid) {
        let mut connections = self.connections.write().await;
        if connections.remove(id).is_some() {
            info!(
                "🔌 Subscriber {} disconnected ({} active)",
                id,
                connections.len()
            );
        }
    }

    /// Send `message` to every open subscriber.
    ///
    /// Subscribers whose channel is closed are pruned after the pass.
    ///
    /// # Returns
    /// Number of subscribers the message was delivered to.
    pub async fn broadcast(&self, message: &str) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        {
            let connections = self.connections.read().await;
            debug!("📤 Broadcasting '{}' to {} subscribers", message, connections.len());

            for (id, tx) in connections.iter() {
                match tx.send(message.to_string()) {
                    Ok(_) => delivered += 1,
                    Err(e) => {
                        warn!("❌ Failed to notify subscriber {}: {}", id, e);
                        closed.push(*id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            let mut connections = self.connections.write().await;
            for id in &closed {
                connections.remove(id);
            }
            info!("🧹 Pruned {} closed subscribers", closed.len());
        }

        delivered
    }

    pub async fn subscriber_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_unregister() {
        let manager = SubscriptionManager::new();
        let (first, _rx1) = manager.register().await;
        let (second, _rx2) = manager.register().await;

        assert_ne!(first, second);
        assert_eq!(manager.subscriber_count().await, 2);

        manager.unregister(&first).await;
        assert_eq!(manager.subscriber_count().await, 1);

        // Second removal is a no-op
        manager.unregister(&first).await;
        assert_eq!(manager.subscriber_count().await, 1);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_open_subscriber() {
        let manager = SubscriptionManager::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            receivers.push(manager.register().await.1);
        }

        assert_eq!(manager.broadcast("51").await, 3);
        for rx in receivers.iter_mut() {
            assert_eq!(rx.recv().await.as_deref(), Some("51"));
        }
    }

    #[tokio::test]
    async fn test_broken_subscriber_does_not_block_others() {
        let manager = SubscriptionManager::new();
        let (_, mut rx1) = manager.register().await;
        let (_, broken) = manager.register().await;
        let (_, mut rx2) = manager.register().await;
        drop(broken);

        assert_eq!(manager.broadcast("7").await, 2);
        assert_eq!(rx1.recv().await.as_deref(), Some("7"));
        assert_eq!(rx2.recv().await.as_deref(), Some("7"));

        // The broken handle was pruned
        assert_eq!(manager.subscriber_count().await, 2);
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let manager = SubscriptionManager::new();
        assert_eq!(manager.broadcast("1").await, 0);
    }

    #[tokio::test]
    async fn test_messages_keep_order() {
        let manager = SubscriptionManager::new();
        let (_, mut rx) = manager.register().await;

        manager.broadcast("51").await;
        manager.broadcast("52").await;

        assert_eq!(rx.recv().await.as_deref(), Some("51"));
        assert_eq!(rx.recv().await.as_deref(), Some("52"));
    }
}
