//! Bid records and their status state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BidId, GigId, UserId};

/// Lifecycle status of a bid.
///
/// `pending -> hired` for at most one bid per gig; every sibling moves
/// `pending -> rejected`. Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Awaiting the gig owner's decision
    #[default]
    Pending,
    /// Chosen by the owner; terminal
    Hired,
    /// Lost to a sibling bid; terminal
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Hired => "hired",
            BidStatus::Rejected => "rejected",
        }
    }

    /// Check if the bid has reached a terminal state.
    pub fn is_resolved(&self) -> bool {
        matches!(self, BidStatus::Hired | BidStatus::Rejected)
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BidStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BidStatus::Pending),
            "hired" => Ok(BidStatus::Hired),
            "rejected" => Ok(BidStatus::Rejected),
            other => Err(format!("unknown bid status: {other}")),
        }
    }
}

/// A freelancer's offer against a gig, carrying price and message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub gig_id: GigId,
    pub freelancer_id: UserId,
    pub message: String,
    /// Offered price in whole currency units.
    pub price: i64,
    #[serde(default)]
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// Create a new pending bid.
    pub fn new(
        gig_id: GigId,
        freelancer_id: UserId,
        message: impl Into<String>,
        price: i64,
    ) -> Self {
        Self {
            id: BidId::new(),
            gig_id,
            freelancer_id,
            message: message.into(),
            price,
            status: BidStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
