//! WebSocket event and command schemas.
//!
//! Server events are pushed to room subscribers as
//! `{"event": "...", "data": {...}}`; client commands arrive as
//! `{"command": "...", ...}`. Field names stay camelCase on the wire for
//! frontend compatibility.

use serde::{Deserialize, Serialize};

use crate::ids::{BidId, GigId};

/// Server-to-client event envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A bid was placed on a gig the subscriber is viewing
    #[serde(rename_all = "camelCase")]
    NewBid {
        gig_id: GigId,
        bid_id: BidId,
        message: String,
    },

    /// The subscriber's bid was hired
    #[serde(rename_all = "camelCase")]
    FreelancerHired {
        message: String,
        gig_id: GigId,
        gig_title: String,
        bid_id: BidId,
    },

    /// A gig was posted, announced to everyone but its owner
    #[serde(rename_all = "camelCase")]
    NewGig {
        message: String,
        gig_id: GigId,
        gig_title: String,
    },
}

impl ServerEvent {
    /// Create a new-bid event.
    pub fn new_bid(gig_id: GigId, bid_id: BidId) -> Self {
        ServerEvent::NewBid {
            gig_id,
            bid_id,
            message: "New bid placed on this gig".to_string(),
        }
    }

    /// Create a freelancer-hired event.
    pub fn freelancer_hired(gig_title: impl Into<String>, gig_id: GigId, bid_id: BidId) -> Self {
        let gig_title = gig_title.into();
        ServerEvent::FreelancerHired {
            message: format!("You have been hired for {gig_title}!"),
            gig_id,
            gig_title,
            bid_id,
        }
    }

    /// Create a new-gig event.
    pub fn new_gig(gig_title: impl Into<String>, gig_id: GigId) -> Self {
        let gig_title = gig_title.into();
        ServerEvent::NewGig {
            message: format!("New gig created: {gig_title}"),
            gig_id,
            gig_title,
        }
    }

    /// Get the wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::NewBid { .. } => "new-bid",
            ServerEvent::FreelancerHired { .. } => "freelancer-hired",
            ServerEvent::NewGig { .. } => "new-gig",
        }
    }
}

/// Client-to-server room command.
///
/// Room membership is always an explicit command, never a side effect of
/// connecting: clients authenticate a fresh connection with `join-room`
/// before anything is delivered to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum ClientCommand {
    /// Join the caller's personal room plus the broadcast room.
    /// Carries the caller's auth token.
    JoinRoom { token: String },

    /// Start receiving bid updates for one gig
    #[serde(rename_all = "camelCase")]
    JoinGigRoom { gig_id: GigId },

    /// Stop receiving bid updates for one gig
    #[serde(rename_all = "camelCase")]
    LeaveGigRoom { gig_id: GigId },
}
