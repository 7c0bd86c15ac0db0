//! Error types for access resolution, storage and the request boundary

use thiserror::Error;

/// Reasons a permission could not be resolved.
///
/// Every variant is a denial. None of them are retried at this layer: each one
/// reflects what the directory reported at the moment of the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No configured rule matches the resource key
    #[error("No matched rule found for {key}")]
    NoMatchingRule { key: String },

    /// The directory could not list the teams of the organization
    #[error("Unable to get information of the organization {organization}: {reason}")]
    OrganizationLookupFailed { organization: String, reason: String },

    /// The organization has no team with the rule's name
    #[error("Unable to get information of the team {team} in {organization}")]
    TeamNotFound { organization: String, team: String },

    /// The membership query failed (typically the user is not a member)
    #[error("The user {username} doesn't belong to {team}: {reason}")]
    MembershipLookupFailed {
        username: String,
        team: String,
        reason: String,
    },

    /// The user is a member, but the membership is not active yet
    #[error("The user {username}'s membership in {team} is {state}, not active")]
    MembershipNotActive {
        username: String,
        team: String,
        state: String,
    },
}

/// Failures reported by an object store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Bucket or key does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Key cannot be mapped onto the store
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors surfaced to the request-handling layer
#[derive(Error, Debug)]
pub enum GateError {
    /// Permission could not be resolved
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Listing or retrieval failed in the object store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The matched rule does not allow browsing
    #[error("Browsing {key} is not permitted for {username}")]
    BrowseDenied { username: String, key: String },

    /// The matched rule does not allow downloading
    #[error("Downloading {key} is not permitted for {username}")]
    DownloadDenied { username: String, key: String },

    /// A rule pattern failed to compile
    #[error("Invalid rule pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GateError {
    /// True when the error means "no access" rather than "nothing there".
    ///
    /// The HTTP layer maps these to 403 and everything else to 404.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            GateError::Access(_) | GateError::BrowseDenied { .. } | GateError::DownloadDenied { .. }
        )
    }
}

/// Result type alias for permission resolution
pub type AccessResult<T> = Result<T, AccessError>;

/// Result type alias for gate operations
pub type GateResult<T> = Result<T, GateError>;
