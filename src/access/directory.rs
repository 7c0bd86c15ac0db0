//! Directory service trait
//!
//! Abstracts team-membership lookups so the rule engine can run against
//! GitHub or any other directory with the same organization/team model.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A team as listed by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub id: u64,
}

impl Team {
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Membership state of a user in a team
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipState {
    /// Confirmed, unrestricted membership
    Active,
    /// Invited but not yet accepted
    Pending,
    /// Any state this crate does not know about
    Other(String),
}

impl MembershipState {
    pub fn is_active(&self) -> bool {
        matches!(self, MembershipState::Active)
    }
}

impl From<&str> for MembershipState {
    fn from(state: &str) -> Self {
        match state {
            "active" => MembershipState::Active,
            "pending" => MembershipState::Pending,
            other => MembershipState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MembershipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipState::Active => write!(f, "active"),
            MembershipState::Pending => write!(f, "pending"),
            MembershipState::Other(state) => write!(f, "{}", state),
        }
    }
}

/// External directory answering "which teams exist" and "is this user in that team".
///
/// Implementations make exactly one request per call. They must not cache:
/// access decisions have to reflect the directory's current state.
#[async_trait::async_trait]
pub trait DirectoryService: Send + Sync {
    /// List the teams of an organization.
    async fn list_teams(&self, organization: &str) -> Result<Vec<Team>>;

    /// Get the membership state of `username` in the team with `team_id`.
    ///
    /// Returns an error when the user is not a member at all.
    async fn membership_state(&self, username: &str, team_id: u64) -> Result<MembershipState>;

    /// Get the directory name (e.g., "github").
    fn directory_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_state_from_str() {
        assert_eq!(MembershipState::from("active"), MembershipState::Active);
        assert_eq!(MembershipState::from("pending"), MembershipState::Pending);
        assert_eq!(
            MembershipState::from("suspended"),
            MembershipState::Other("suspended".into())
        );
        assert!(MembershipState::from("active").is_active());
        assert!(!MembershipState::from("pending").is_active());
    }

    #[test]
    fn test_membership_state_display() {
        assert_eq!(MembershipState::Pending.to_string(), "pending");
        assert_eq!(MembershipState::Other("odd".into()).to_string(), "odd");
    }
}
