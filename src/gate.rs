//! Request boundary
//!
//! Combines the rule engine and the archive browser into the two operations
//! the HTTP layer serves: browsing a directory and downloading an object.
//! Every failure path is a denial; nothing falls back to a granted permission.

use std::sync::Arc;
use std::time::Duration;

use crate::access::{DirectoryService, Permission, RuleEngine};
use crate::archive::{ArchiveBrowser, Listing, ObjectStore};
use crate::core::{GateConfig, GateError, GateResult};

/// How long minted download URLs stay valid by default
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// Permission-checked access to an archive
pub struct ArchiveGate {
    engine: RuleEngine,
    browser: ArchiveBrowser,
    download_ttl: Duration,
}

impl ArchiveGate {
    pub fn new(engine: RuleEngine, browser: ArchiveBrowser) -> Self {
        Self {
            engine,
            browser,
            download_ttl: DOWNLOAD_URL_TTL,
        }
    }

    /// Build the engine and browser from configuration
    pub fn from_config(
        config: &GateConfig,
        directory: Arc<dyn DirectoryService>,
        store: Arc<dyn ObjectStore>,
    ) -> GateResult<Self> {
        let engine = RuleEngine::from_config(config, directory)?;
        let browser = ArchiveBrowser::new(store, config.delimiter);
        Ok(Self::new(engine, browser))
    }

    /// Set how long download URLs stay valid
    pub fn with_download_ttl(mut self, ttl: Duration) -> Self {
        self.download_ttl = ttl;
        self
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn browser(&self) -> &ArchiveBrowser {
        &self.browser
    }

    /// Resolve the permission of `username` on `key`
    pub async fn permission(&self, username: &str, key: &str) -> GateResult<Permission> {
        Ok(self.engine.resolve_permission(username, key).await?)
    }

    /// List `path` for `username`, who needs browse permission on it
    pub async fn browse(&self, username: &str, path: &str) -> GateResult<Listing> {
        let permission = self.permission(username, path).await?;
        if !permission.allow_browse {
            tracing::warn!("{} may not browse {:?}", username, path);
            return Err(GateError::BrowseDenied {
                username: username.to_string(),
                key: path.to_string(),
            });
        }

        Ok(self.browser.browse(path).await?)
    }

    /// Mint a download URL of `key` for `username`, who needs download permission on it
    pub async fn download_url(&self, username: &str, key: &str) -> GateResult<String> {
        let permission = self.permission(username, key).await?;
        if !permission.allow_download {
            tracing::warn!("{} may not download {:?}", username, key);
            return Err(GateError::DownloadDenied {
                username: username.to_string(),
                key: key.to_string(),
            });
        }

        let url = self.browser.retrieval_url(key, self.download_ttl).await?;
        tracing::info!("Issued download URL of {} for {}", key, username);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::FakeDirectory;
    use crate::archive::FakeStore;
    use crate::core::{AccessError, RuleConfig, StoreError};
    use std::sync::atomic::Ordering;

    fn directory() -> Arc<FakeDirectory> {
        Arc::new(
            FakeDirectory::new()
                .with_team("acme", "builders", 7)
                .with_team("acme", "viewers", 8)
                .with_member("octocat", 7, "active")
                .with_member("viewer", 8, "active")
                .with_member("newbie", 7, "pending"),
        )
    }

    fn store() -> Arc<FakeStore> {
        Arc::new(
            FakeStore::new()
                .with_listing("release/", &["release/1.0/"], &["release/NOTES"])
                .with_listing("docs/", &[], &["docs/guide.md"]),
        )
    }

    fn gate(store: Arc<FakeStore>) -> ArchiveGate {
        let config = GateConfig::new("acme", "builders", "artifacts")
            .add_rule(
                RuleConfig::new(r"^/docs/")
                    .with_team("acme", "viewers")
                    .with_permission(true, false),
            )
            .add_rule(RuleConfig::new(r"^/.*"));
        ArchiveGate::from_config(&config, directory(), store).unwrap()
    }

    #[tokio::test]
    async fn test_browse_granted() {
        let gate = gate(store());

        let listing = gate.browse("octocat", "release/").await.unwrap();
        assert_eq!(listing.path, "release/");
        assert_eq!(listing.parent, None);
        let names: Vec<_> = listing.entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["NOTES", "1.0/"]);
    }

    #[tokio::test]
    async fn test_browse_denied_never_lists() {
        let store = store();
        let gate = gate(store.clone());

        let err = gate.browse("newbie", "release/").await.unwrap_err();
        assert!(matches!(
            err,
            GateError::Access(AccessError::MembershipNotActive { .. })
        ));
        assert!(err.is_denial());
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_browse_listing_failure_is_error() {
        let gate = gate(store());

        let err = gate.browse("octocat", "missing/").await.unwrap_err();
        assert!(matches!(err, GateError::Store(StoreError::Backend(_))));
        assert!(!err.is_denial());
    }

    #[tokio::test]
    async fn test_download_requires_download_permission() {
        let gate = gate(store());

        assert!(gate.browse("viewer", "docs/").await.is_ok());

        let err = gate.download_url("viewer", "docs/guide.md").await.unwrap_err();
        assert!(matches!(
            err,
            GateError::DownloadDenied { ref username, ref key } if username == "viewer" && key == "docs/guide.md"
        ));
    }

    #[tokio::test]
    async fn test_download_url_ttl() {
        let gate = gate(store());

        let url = gate.download_url("octocat", "release/NOTES").await.unwrap();
        assert_eq!(url, "https://fake.example/release/NOTES?expires=3600");

        let gate = gate.with_download_ttl(Duration::from_secs(60));
        let url = gate.download_url("octocat", "release/NOTES").await.unwrap();
        assert!(url.ends_with("expires=60"));
    }

    #[tokio::test]
    async fn test_browse_denied_by_rule() {
        let directory = directory();
        let config = GateConfig::new("acme", "builders", "artifacts")
            .add_rule(RuleConfig::new(r"^/").with_permission(false, true));
        let gate = ArchiveGate::from_config(&config, directory, store()).unwrap();

        let err = gate.browse("octocat", "release/").await.unwrap_err();
        assert!(matches!(err, GateError::BrowseDenied { .. }));
        assert!(gate.download_url("octocat", "release/NOTES").await.is_ok());
    }
}
