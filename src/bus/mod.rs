//! Event bus for adapter → host notifications
//!
//! Uses tokio::sync::broadcast for pub/sub. Observers (the SSE endpoint, tests)
//! subscribe; adapters publish and never wait on delivery.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::adapters::state::{NormalizedState, PlayerState};

/// Event types that can be published on the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BusEvent {
    /// First successful poll after being unreachable
    PlayerConnected { url: String },
    /// First failed poll after being reachable
    PlayerDisconnected { url: String },
    /// State was re-read outside the regular schedule (e.g. after a seek)
    StateRefreshed {
        url: String,
        state: PlayerState,
        snapshot: NormalizedState,
    },
    /// A command left for the player; delivery is not confirmed
    CommandSent { url: String, wm_command: String },
}

/// Event bus handle for publishing and subscribing
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BusEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: BusEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

pub type SharedBus = Arc<EventBus>;

pub fn create_bus() -> SharedBus {
    Arc::new(EventBus::default())
}
