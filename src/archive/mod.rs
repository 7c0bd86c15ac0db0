//! Browsable view over a flat object store
//!
//! Keys such as `release/1.0/app.tar.gz` are presented as a tree: listing
//! `release/` shows the container `1.0/`, and `..` leads back to the parent.

mod browser;
mod local;
mod paths;
mod store;

pub use browser::{ArchiveBrowser, Entry, Listing};
pub use local::LocalFsStore;
pub use paths::{derive_display_name, PathResolver};
pub use store::{ObjectListing, ObjectStore};

#[cfg(test)]
pub(crate) use browser::tests::FakeStore;
