//! Object store trait
//!
//! Abstracts the flat, prefix-addressed storage behind the archive so the
//! browser can run against S3, a local directory or a test double.

use std::time::Duration;

use crate::core::StoreError;

/// Result of a prefix + delimiter listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectListing {
    /// Keys that act as prefixes for deeper keys ("directories")
    pub containers: Vec<String>,
    /// Keys that address content directly
    pub items: Vec<String>,
}

/// Flat key/value storage with delimiter-grouped listings
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the keys under `prefix`, grouping everything past the next
    /// `delimiter` into a container key.
    ///
    /// A prefix with nothing under it yields an empty listing, not an error.
    async fn list_entries(&self, prefix: &str, delimiter: char) -> Result<ObjectListing, StoreError>;

    /// Mint a URL from which `key` can be fetched for at most `expires_in`.
    async fn retrieval_url(&self, key: &str, expires_in: Duration) -> Result<String, StoreError>;

    /// Get the store name (e.g., "local", "s3").
    fn store_name(&self) -> &str;
}
