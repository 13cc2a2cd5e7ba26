//! User account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A registered account. Owners post gigs; freelancers place bids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Salted digest of the password; never serialized.
    #[serde(skip_serializing, default)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_digest: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            password_digest: password_digest.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_digest_never_serialized() {
        let user = User::new("Ada", "ada@example.com", "salt$digest");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("digest"));
        assert!(json.contains("\"email\":\"ada@example.com\""));
    }
}
