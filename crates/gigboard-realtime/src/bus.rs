//! Room-based event bus over live connections.

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use gigboard_models::ServerEvent;

use crate::room::Room;

/// Outbound buffer per connection. A subscriber that falls this far behind
/// starts losing events rather than blocking publishers.
pub const EVENT_BUFFER_SIZE: usize = 32;

/// Identifier for one live connection.
pub type ConnectionId = Uuid;

/// Sender half handed to the bus when a connection registers.
pub type EventSender = mpsc::Sender<ServerEvent>;

struct Subscriber {
    tx: EventSender,
    /// Names of every room this connection currently belongs to.
    rooms: HashSet<String>,
}

#[derive(Default)]
struct Registry {
    rooms: HashMap<String, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, Subscriber>,
}

/// Process-wide publish/subscribe hub.
///
/// One instance is constructed at startup and injected into every component
/// that publishes. Delivery is fire-and-forget: no acknowledgment, no retry,
/// and nothing is queued for subscribers that are not connected at publish
/// time. Membership mutations and publishes synchronize on a single lock,
/// so concurrent join/leave/disconnect cannot lose updates.
pub struct EventBus {
    registry: RwLock<Registry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
        }
    }

    /// Create a bounded channel suitable for [`register`](Self::register).
    pub fn channel() -> (EventSender, mpsc::Receiver<ServerEvent>) {
        mpsc::channel(EVENT_BUFFER_SIZE)
    }

    /// Attach a live connection and get its id.
    pub async fn register(&self, tx: EventSender) -> ConnectionId {
        let id = Uuid::new_v4();
        let mut registry = self.registry.write().await;
        registry.connections.insert(
            id,
            Subscriber {
                tx,
                rooms: HashSet::new(),
            },
        );
        debug!(conn = %id, "connection registered");
        id
    }

    /// Add a connection to a room. Joining twice has the effect of joining
    /// once; joining from an unregistered connection is a no-op.
    pub async fn join(&self, conn: ConnectionId, room: &Room) {
        let name = room.name();
        let mut registry = self.registry.write().await;
        let Some(subscriber) = registry.connections.get_mut(&conn) else {
            return;
        };
        subscriber.rooms.insert(name.clone());
        registry.rooms.entry(name).or_default().insert(conn);
    }

    /// Remove a connection from a room. Leaving a room it never joined is a
    /// no-op.
    pub async fn leave(&self, conn: ConnectionId, room: &Room) {
        let name = room.name();
        let mut registry = self.registry.write().await;
        if let Some(subscriber) = registry.connections.get_mut(&conn) {
            subscriber.rooms.remove(&name);
        }
        if let Some(members) = registry.rooms.get_mut(&name) {
            members.remove(&conn);
            if members.is_empty() {
                registry.rooms.remove(&name);
            }
        }
    }

    /// Drop a connection and remove it from every room it belonged to.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let mut registry = self.registry.write().await;
        let Some(subscriber) = registry.connections.remove(&conn) else {
            return;
        };
        for name in subscriber.rooms {
            if let Some(members) = registry.rooms.get_mut(&name) {
                members.remove(&conn);
                if members.is_empty() {
                    registry.rooms.remove(&name);
                }
            }
        }
        debug!(conn = %conn, "connection dropped from all rooms");
    }

    /// Deliver an event to every current member of a room.
    ///
    /// Returns the number of subscribers the event was handed to. A full or
    /// closed outbound buffer drops the event for that subscriber.
    pub async fn publish(&self, room: &Room, event: ServerEvent) -> usize {
        let registry = self.registry.read().await;
        let Some(members) = registry.rooms.get(&room.name()) else {
            debug!(room = %room, event = event.name(), "publish to empty room");
            return 0;
        };
        Self::deliver(&registry, members.iter().copied(), &event, room)
    }

    /// Deliver to every member of `room` that is not also a member of
    /// `except`. Used for broadcast announcements that skip the actor's
    /// personal room.
    pub async fn publish_except(&self, room: &Room, except: &Room, event: ServerEvent) -> usize {
        let registry = self.registry.read().await;
        let Some(members) = registry.rooms.get(&room.name()) else {
            return 0;
        };
        let excluded = registry.rooms.get(&except.name());
        let targets = members
            .iter()
            .copied()
            .filter(|conn| excluded.map_or(true, |ex| !ex.contains(conn)));
        Self::deliver(&registry, targets, &event, room)
    }

    fn deliver(
        registry: &Registry,
        targets: impl Iterator<Item = ConnectionId>,
        event: &ServerEvent,
        room: &Room,
    ) -> usize {
        let mut delivered = 0;
        for conn in targets {
            let Some(subscriber) = registry.connections.get(&conn) else {
                continue;
            };
            match subscriber.tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    debug!(conn = %conn, room = %room, event = event.name(),
                        "dropping event for slow or closed connection");
                }
            }
        }
        delivered
    }

    /// Number of current members of a room.
    pub async fn room_size(&self, room: &Room) -> usize {
        let registry = self.registry.read().await;
        registry
            .rooms
            .get(&room.name())
            .map_or(0, |members| members.len())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
