//! Shared data models for the Gigboard backend.
//!
//! This crate provides Serde-serializable types for:
//! - Users, gigs, and bids with their status state machines
//! - Typed identifiers
//! - WebSocket event and command schemas

pub mod bid;
pub mod events;
pub mod gig;
pub mod ids;
pub mod user;

// Re-export common types
pub use bid::{Bid, BidStatus};
pub use events::{ClientCommand, ServerEvent};
pub use gig::{Gig, GigStatus, GigSummary};
pub use ids::{BidId, GigId, UserId};
pub use user::User;
