//! Local filesystem object store
//!
//! Serves a directory tree as a flat key space: each regular file under the
//! root is one key, its relative path joined with `/`. Directories are never
//! keys themselves; they show up only as containers in listings.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::store::{ObjectListing, ObjectStore};
use crate::core::StoreError;

const KEY_SEPARATOR: char = '/';

/// `ObjectStore` over a local directory
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All keys under the root, sorted
    async fn collect_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut pending = vec![(self.root.clone(), String::new())];

        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = match entry.file_name().into_string() {
                    Ok(name) => name,
                    Err(raw) => {
                        tracing::warn!("Skipping non UTF-8 file name {:?} in {}", raw, dir.display());
                        continue;
                    }
                };

                let key = format!("{}{}", prefix, name);
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push((entry.path(), format!("{}{}", key, KEY_SEPARATOR)));
                } else if file_type.is_file() {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Map a key onto a path below the root, refusing anything that could escape it
    fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self.root.clone();
        for segment in key.split(KEY_SEPARATOR) {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => path.push(part),
                _ => return Err(StoreError::InvalidKey(key.to_string())),
            }
        }
        Ok(path)
    }
}

/// Group `keys` below `prefix` the way a delimiter listing does
fn group_keys(keys: &[String], prefix: &str, delimiter: char) -> ObjectListing {
    let mut containers = BTreeSet::new();
    let mut items = Vec::new();

    for key in keys {
        let rest = match key.strip_prefix(prefix) {
            Some(rest) => rest,
            None => continue,
        };

        match rest.find(delimiter) {
            Some(index) => {
                let end = prefix.len() + index + delimiter.len_utf8();
                containers.insert(key[..end].to_string());
            }
            None => items.push(key.clone()),
        }
    }

    ObjectListing {
        containers: containers.into_iter().collect(),
        items,
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalFsStore {
    async fn list_entries(&self, prefix: &str, delimiter: char) -> Result<ObjectListing, StoreError> {
        if !tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(StoreError::NotFound(self.root.display().to_string()));
        }

        let keys = self.collect_keys().await?;
        let listing = group_keys(&keys, prefix, delimiter);
        tracing::debug!(
            "[LocalFs] {:?}: {} containers, {} items",
            prefix,
            listing.containers.len(),
            listing.items.len()
        );
        Ok(listing)
    }

    async fn retrieval_url(&self, key: &str, expires_in: Duration) -> Result<String, StoreError> {
        let path = self.key_path(key)?;

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(StoreError::NotFound(key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        let path = tokio::fs::canonicalize(&path).await?;
        // file:// URLs cannot expire
        tracing::debug!(
            "[LocalFs] URL for {} requested with {}s expiry",
            key,
            expires_in.as_secs()
        );
        Ok(format!("file://{}", path.display()))
    }

    fn store_name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, file.as_bytes()).unwrap();
        }
        dir
    }

    #[test]
    fn test_group_keys() {
        let keys: Vec<String> = ["a/x", "a/y/1", "a/y/2", "a/z/deep/3", "b"]
            .iter()
            .map(|k| k.to_string())
            .collect();

        let listing = group_keys(&keys, "a/", '/');
        assert_eq!(listing.containers, vec!["a/y/", "a/z/"]);
        assert_eq!(listing.items, vec!["a/x"]);

        let listing = group_keys(&keys, "", '/');
        assert_eq!(listing.containers, vec!["a/"]);
        assert_eq!(listing.items, vec!["b"]);
    }

    #[tokio::test]
    async fn test_list_entries() {
        let dir = create_tree(&["release/1.0/app.tar.gz", "release/1.1/app.tar.gz", "README"]);
        let store = LocalFsStore::new(dir.path());

        let root = store.list_entries("", '/').await.unwrap();
        assert_eq!(root.containers, vec!["release/"]);
        assert_eq!(root.items, vec!["README"]);

        let release = store.list_entries("release/", '/').await.unwrap();
        assert_eq!(release.containers, vec!["release/1.0/", "release/1.1/"]);
        assert!(release.items.is_empty());

        let empty = store.list_entries("nothing/", '/').await.unwrap();
        assert_eq!(empty, ObjectListing::default());
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalFsStore::new(dir.path().join("gone"));

        let err = store.list_entries("", '/').await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_retrieval_url() {
        let dir = create_tree(&["release/1.0/app.tar.gz"]);
        let store = LocalFsStore::new(dir.path());

        let url = store
            .retrieval_url("release/1.0/app.tar.gz", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("app.tar.gz"));

        let err = store
            .retrieval_url("release/1.0/missing", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store
            .retrieval_url("release/1.0", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_retrieval_url_rejects_escapes() {
        let dir = create_tree(&["a/b"]);
        let store = LocalFsStore::new(dir.path());

        for key in ["../secret", "a/../../secret", "/etc/passwd", "a//b", "", "a/./b"] {
            let err = store
                .retrieval_url(key, Duration::from_secs(60))
                .await
                .unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "{}", key);
        }
    }
}
