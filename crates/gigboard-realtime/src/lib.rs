//! In-process publish/subscribe over named rooms.
//!
//! This crate provides:
//! - Room naming for personal, per-gig, and broadcast channels
//! - A registry of live connections and their room memberships
//! - Fire-and-forget event delivery with no queuing for absent subscribers

pub mod bus;
pub mod room;

pub use bus::{ConnectionId, EventBus, EventSender, EVENT_BUFFER_SIZE};
pub use room::Room;
