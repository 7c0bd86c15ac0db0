//! Directory listings over an object store

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::paths::PathResolver;
use super::store::ObjectStore;
use crate::core::StoreError;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Name relative to the listed directory
    pub display_name: String,
    /// Full key in the store
    pub key: String,
    /// True for prefixes that group deeper keys
    pub is_container: bool,
}

/// A listed directory together with where ".." leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub path: String,
    pub parent: Option<String>,
    pub entries: Vec<Entry>,
}

/// Presents an object store as a navigable tree
pub struct ArchiveBrowser {
    store: Arc<dyn ObjectStore>,
    paths: PathResolver,
}

impl ArchiveBrowser {
    pub fn new(store: Arc<dyn ObjectStore>, delimiter: char) -> Self {
        Self {
            store,
            paths: PathResolver::new(delimiter),
        }
    }

    pub fn paths(&self) -> &PathResolver {
        &self.paths
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// List the direct children of `path`, sorted by display name, descending.
    ///
    /// Store failures are returned unchanged; they never turn into an empty listing.
    pub async fn list_directory(&self, path: &str) -> Result<Vec<Entry>, StoreError> {
        let listing = self
            .store
            .list_entries(path, self.paths.delimiter())
            .await
            .map_err(|e| {
                tracing::warn!("Listing {:?} in {} failed: {}", path, self.store.store_name(), e);
                e
            })?;

        let containers = listing.containers.into_iter().map(|key| (key, true));
        let items = listing.items.into_iter().map(|key| (key, false));

        let mut entries: Vec<Entry> = containers
            .chain(items)
            .map(|(key, is_container)| Entry {
                display_name: self.paths.display_name(&key, path),
                key,
                is_container,
            })
            .collect();

        entries.sort_by(|a, b| b.display_name.cmp(&a.display_name));
        Ok(entries)
    }

    /// List `path` and compute its parent
    pub async fn browse(&self, path: &str) -> Result<Listing, StoreError> {
        let entries = self.list_directory(path).await?;
        tracing::debug!("Listed {} entries under {:?}", entries.len(), path);

        Ok(Listing {
            path: path.to_string(),
            parent: self.paths.parent_path(path),
            entries,
        })
    }

    /// Mint a time-limited retrieval URL for `key`
    pub async fn retrieval_url(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        self.store.retrieval_url(key, expires_in).await
    }
}
