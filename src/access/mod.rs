//! Access control for archive resources
//!
//! Resource keys are matched against an ordered list of rules. The first
//! matching rule names a team; the user gets the rule's permission only while
//! their membership in that team is active.
//!
//! ## Example
//!
//! ```rust,ignore
//! use archive_gate::access::{GitHubDirectory, RuleEngine};
//! use archive_gate::core::GateConfig;
//! use std::sync::Arc;
//!
//! let config = GateConfig::from_env()?;
//! let engine = RuleEngine::from_config(&config, Arc::new(GitHubDirectory::from_env()?))?;
//!
//! match engine.resolve_permission("octocat", "release/1.0/").await {
//!     Ok(permission) if permission.allow_browse => { /* list */ }
//!     Ok(_) => { /* matched, but browsing not granted */ }
//!     Err(e) => { /* denied: e names the reason */ }
//! }
//! ```

mod directory;
mod engine;
mod github;
mod rule;

pub use directory::{DirectoryService, MembershipState, Team};
pub use engine::RuleEngine;
pub use github::GitHubDirectory;
pub use rule::{normalize_key, AccessRule, Permission, RuleSet};

#[cfg(test)]
pub(crate) use engine::tests::FakeDirectory;
