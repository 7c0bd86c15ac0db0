//! Gate configuration
//!
//! Organization, team, bucket and delimiter are injected here once, at the
//! binary edge. Nothing inside the library reads the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{GateError, GateResult};

/// Default key delimiter of the object store
pub const DEFAULT_DELIMITER: char = '/';

/// Pattern of the catch-all rule used when no rules are configured
pub const CATCH_ALL_PATTERN: &str = r"^/.*";

/// One configured access rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Regular expression matched against the normalized key
    pub pattern: String,

    /// Organization owning the team; defaults to the gate's organization
    #[serde(default)]
    pub organization: Option<String>,

    /// Team whose active members are granted the permission; defaults to the gate's team
    #[serde(default)]
    pub team: Option<String>,

    #[serde(default = "default_allow")]
    pub allow_browse: bool,

    #[serde(default = "default_allow")]
    pub allow_download: bool,
}

fn default_allow() -> bool {
    true
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

impl RuleConfig {
    /// Create a rule granting browse and download for the gate's organization and team
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            organization: None,
            team: None,
            allow_browse: true,
            allow_download: true,
        }
    }

    /// Check membership in another team
    pub fn with_team(mut self, organization: impl Into<String>, team: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self.team = Some(team.into());
        self
    }

    /// Set the granted permission
    pub fn with_permission(mut self, allow_browse: bool, allow_download: bool) -> Self {
        self.allow_browse = allow_browse;
        self.allow_download = allow_download;
        self
    }
}

/// Configuration of an archive gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// GitHub organization checked by default rules
    pub organization: String,

    /// Team within the organization checked by default rules
    pub team: String,

    /// Bucket (or root directory) holding the archive
    pub bucket: String,

    /// Segment delimiter of the key space
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Ordered access rules; the first matching rule wins
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl GateConfig {
    /// Create a configuration with the default delimiter and no explicit rules
    pub fn new(
        organization: impl Into<String>,
        team: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            team: team.into(),
            bucket: bucket.into(),
            delimiter: DEFAULT_DELIMITER,
            rules: Vec::new(),
        }
    }

    /// Read `AC_ORG`, `AC_TEAM`, `AWS_BUCKET` and optionally `ARCHIVE_DELIMITER`
    pub fn from_env() -> GateResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> GateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| GateError::InvalidConfig(format!("{} is not set", name)))
        };

        let mut config = Self::new(required("AC_ORG")?, required("AC_TEAM")?, required("AWS_BUCKET")?);

        if let Some(raw) = lookup("ARCHIVE_DELIMITER") {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => config.delimiter = c,
                _ => {
                    return Err(GateError::InvalidConfig(format!(
                        "ARCHIVE_DELIMITER must be a single character, got {:?}",
                        raw
                    )))
                }
            }
        }

        Ok(config)
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> GateResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GateError::InvalidConfig(format!("Failed to parse configuration: {}", e)))
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> GateResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            GateError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Set the key delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Append a rule after the already configured ones
    pub fn add_rule(mut self, rule: RuleConfig) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in evaluation order, falling back to the catch-all rule
    pub fn effective_rules(&self) -> Vec<RuleConfig> {
        if self.rules.is_empty() {
            vec![RuleConfig::new(CATCH_ALL_PATTERN)]
        } else {
            self.rules.clone()
        }
    }
}
