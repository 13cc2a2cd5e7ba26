//! Gig records and their status state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{GigId, UserId};

/// Lifecycle status of a gig.
///
/// Transitions only `open -> assigned`, and only through a successful hire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GigStatus {
    /// Open for bidding
    #[default]
    Open,
    /// A bid was hired; terminal
    Assigned,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Open => "open",
            GigStatus::Assigned => "assigned",
        }
    }

    /// Check if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GigStatus::Assigned)
    }
}

impl fmt::Display for GigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GigStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(GigStatus::Open),
            "assigned" => Ok(GigStatus::Assigned),
            other => Err(format!("unknown gig status: {other}")),
        }
    }
}

/// A unit of work posted by an owner, open for bidding until assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    pub id: GigId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    /// Budget in whole currency units.
    pub budget: i64,
    #[serde(default)]
    pub status: GigStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Gig {
    /// Create a new open gig.
    pub fn new(
        owner_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        budget: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: GigId::new(),
            owner_id,
            title: title.into(),
            description: description.into(),
            budget,
            status: GigStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark as assigned.
    pub fn assign(mut self) -> Self {
        self.status = GigStatus::Assigned;
        self.updated_at = Utc::now();
        self
    }
}

/// A gig with its bid count, for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GigSummary {
    #[serde(flatten)]
    pub gig: Gig,
    pub bid_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gig_is_open() {
        let gig = Gig::new(UserId::new(), "Logo design", "A fresh logo", 500);
        assert_eq!(gig.status, GigStatus::Open);
        assert!(!gig.status.is_terminal());
    }

    #[test]
    fn test_assign_is_terminal() {
        let gig = Gig::new(UserId::new(), "Logo design", "", 500).assign();
        assert_eq!(gig.status, GigStatus::Assigned);
        assert!(gig.status.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [GigStatus::Open, GigStatus::Assigned] {
            assert_eq!(status.as_str().parse::<GigStatus>().unwrap(), status);
        }
        assert!("closed".parse::<GigStatus>().is_err());
    }

    #[test]
    fn test_gig_serializes_camel_case() {
        let gig = Gig::new(UserId::from_string("owner-1"), "Logo", "", 500);
        let json = serde_json::to_string(&gig).unwrap();
        assert!(json.contains("\"ownerId\":\"owner-1\""));
        assert!(json.contains("\"status\":\"open\""));
    }
}
