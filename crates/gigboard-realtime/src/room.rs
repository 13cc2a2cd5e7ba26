//! Room naming.

use std::fmt;

use gigboard_models::{GigId, UserId};

/// Broadcast room every authenticated connection joins.
pub const ALL_USERS_ROOM: &str = "all-users";

/// A logical channel scoping which connections receive an event.
///
/// Rooms are distinguished only by naming convention; membership lives in
/// the [`EventBus`](crate::EventBus) for the lifetime of connections and is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Room {
    /// A user's personal room (`user-<id>`)
    User(UserId),
    /// Subscribers viewing one gig's detail (`gig-<id>`)
    Gig(GigId),
    /// Every connected client (`all-users`)
    AllUsers,
}

impl Room {
    /// Personal room for a user.
    pub fn user(id: UserId) -> Self {
        Room::User(id)
    }

    /// Room for a gig's detail view.
    pub fn gig(id: GigId) -> Self {
        Room::Gig(id)
    }

    /// Get the room's wire name.
    pub fn name(&self) -> String {
        match self {
            Room::User(id) => format!("user-{id}"),
            Room::Gig(id) => format!("gig-{id}"),
            Room::AllUsers => ALL_USERS_ROOM.to_string(),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
