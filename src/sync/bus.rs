//! Group-update broadcast bus

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::broadcast;
use tracing::trace;

/// Lifecycle status of an item group (a chat channel, a feed, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupStatus {
    Active,
    Locked,
    Archived,
}

/// Snapshot of a group's most recent state, published whenever the component
/// owning that group's list changes it.
///
/// Semantics are last-writer-wins: consumers overwrite whatever they were
/// showing with the most recent broadcast; there is no merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupUpdate<T> {
    /// Identity key of the group this update is about.
    pub group_id: String,
    pub status: GroupStatus,
    /// Newest-first preview of the group's items, bounded by the publisher.
    pub recent_items: Vec<T>,
}

/// Publish/subscribe channel for [`GroupUpdate`]s.
///
/// Cloning the bus is cheap; every clone publishes into the same stream.
/// Publishing is fire-and-forget: with no subscribers the update is dropped,
/// and slow subscribers observe a lag error rather than blocking publishers.
#[derive(Debug, Clone)]
pub struct SyncBus<T> {
    tx: broadcast::Sender<GroupUpdate<T>>,
}

impl<T: Clone + Send + 'static> SyncBus<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an update to every current subscriber.
    /// Returns the number of subscribers that will see it.
    pub fn publish(&self, update: GroupUpdate<T>) -> usize {
        let group_id = update.group_id.clone();
        match self.tx.send(update) {
            Ok(receivers) => {
                trace!(%group_id, receivers, "published group update");
                receivers
            }
            Err(_) => {
                trace!(%group_id, "no subscribers for group update");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GroupUpdate<T>> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + Send + 'static> Default for SyncBus<T> {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn update(group_id: &str, body: &str) -> GroupUpdate<String> {
        GroupUpdate {
            group_id: group_id.to_string(),
            status: GroupStatus::Active,
            recent_items: vec![body.to_string()],
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let bus: SyncBus<String> = SyncBus::new(8);
        assert_eq!(bus.publish(update("chan-1", "hello")), 0);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let bus: SyncBus<String> = SyncBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(update("chan-1", "hello")), 2);

        assert_eq!(a.recv().await.expect("a").group_id, "chan-1");
        assert_eq!(b.recv().await.expect("b").recent_items, vec!["hello"]);
    }

    #[tokio::test]
    async fn test_last_writer_wins_ordering() {
        let bus: SyncBus<String> = SyncBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(update("chan-1", "first"));
        bus.publish(update("chan-1", "second"));

        // Updates arrive in publish order; the consumer applies each one over
        // the last, so the second snapshot is what sticks.
        assert_eq!(rx.recv().await.expect("first").recent_items, vec!["first"]);
        assert_eq!(rx.recv().await.expect("second").recent_items, vec!["second"]);
    }

    #[test]
    fn test_group_status_string_forms() {
        assert_eq!(GroupStatus::Active.to_string(), "active");
        assert_eq!(GroupStatus::from_str("archived"), Ok(GroupStatus::Archived));
    }

    #[test]
    fn test_group_update_serialization() {
        let update = update("chan-1", "hello");
        let json = serde_json::to_string(&update).expect("serialize");
        let back: GroupUpdate<String> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, update);
        assert!(json.contains("\"status\":\"active\""));
    }
}
