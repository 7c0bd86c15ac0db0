//! Directory-style navigation over a flat, delimiter-segmented key space

use crate::core::DEFAULT_DELIMITER;

/// Computes parents and display names of keys in a flat store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathResolver {
    delimiter: char,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl PathResolver {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parent of `key`, or `None` when `key` is the root or a top-level entry.
    ///
    /// One trailing delimiter is ignored, so `a/b/` and `a/b` share the parent `a`.
    /// Walking parents always terminates: each step strictly shortens the key.
    pub fn parent_path(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }

        let trimmed = key.strip_suffix(self.delimiter).unwrap_or(key);
        let mut segments = trimmed.rsplit(self.delimiter);
        let last = segments.next()?;
        segments.next()?;

        let cut = last.len() + self.delimiter.len_utf8();
        let parent = &trimmed[..trimmed.len() - cut];
        if parent.is_empty() {
            None
        } else {
            Some(parent.to_string())
        }
    }

    /// Name of `entry_key` as shown inside a listing of `root`
    pub fn display_name(&self, entry_key: &str, root: &str) -> String {
        derive_display_name(entry_key, root)
    }
}

/// Drop as many leading characters from `entry_key` as `root` has.
///
/// Assumes `entry_key` starts with `root`, which holds for everything a store
/// returns for a prefix listing. An empty root leaves the key untouched.
pub fn derive_display_name(entry_key: &str, root: &str) -> String {
    if root.is_empty() {
        return entry_key.to_string();
    }
    entry_key.chars().skip(root.chars().count()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_path() {
        let paths = PathResolver::default();

        assert_eq!(paths.parent_path("/a/b/").as_deref(), Some("/a"));
        assert_eq!(paths.parent_path("/a/b").as_deref(), Some("/a"));
        assert_eq!(paths.parent_path("/a"), None);
        assert_eq!(paths.parent_path(""), None);
        assert_eq!(paths.parent_path("/"), None);
    }

    #[test]
    fn test_parent_path_relative_keys() {
        let paths = PathResolver::default();

        assert_eq!(paths.parent_path("release/1.0/").as_deref(), Some("release"));
        assert_eq!(paths.parent_path("release/1.0/app.tar.gz").as_deref(), Some("release/1.0"));
        assert_eq!(paths.parent_path("release/"), None);
        assert_eq!(paths.parent_path("release"), None);
    }

    #[test]
    fn test_parent_path_terminates() {
        let paths = PathResolver::default();

        for start in ["/a/b/c/d/", "a/b/c/d", "//x//y//", "/ü/ß/é/"] {
            let mut current = Some(start.to_string());
            let mut steps = 0;
            while let Some(key) = current {
                let next = paths.parent_path(&key);
                if let Some(parent) = &next {
                    assert!(parent.len() < key.len(), "{} -> {}", key, parent);
                }
                current = next;
                steps += 1;
                assert!(steps <= start.len() + 1);
            }
        }
    }

    #[test]
    fn test_parent_path_other_delimiter() {
        let paths = PathResolver::new(':');

        assert_eq!(paths.parent_path("a:b:c:").as_deref(), Some("a:b"));
        assert_eq!(paths.parent_path("a/b"), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(derive_display_name("/a/b/c", "/a/b/"), "c");
        assert_eq!(derive_display_name("/a/b/c", ""), "/a/b/c");
        assert_eq!(derive_display_name("/a/b/sub/", "/a/b/"), "sub/");
        assert_eq!(derive_display_name("über/straße", "über/"), "straße");
    }
}
