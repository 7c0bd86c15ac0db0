//! Access rules and their ordered, immutable set

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::{GateConfig, GateError, GateResult};

/// What a matched rule grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub allow_browse: bool,
    pub allow_download: bool,
}

impl Permission {
    pub const fn new(allow_browse: bool, allow_download: bool) -> Self {
        Self {
            allow_browse,
            allow_download,
        }
    }

    /// Browse and download
    pub const fn full() -> Self {
        Self::new(true, true)
    }
}

/// A rule mapping resource keys to a team whose active members get `permission`
#[derive(Debug, Clone)]
pub struct AccessRule {
    pattern: Regex,
    organization: String,
    team: String,
    permission: Permission,
}

impl AccessRule {
    /// Compile a rule. Fails when `pattern` is not a valid regular expression.
    pub fn new(
        pattern: &str,
        organization: impl Into<String>,
        team: impl Into<String>,
        permission: Permission,
    ) -> GateResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| GateError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern,
            organization: organization.into(),
            team: team.into(),
            permission,
        })
    }

    /// Check if this rule applies to an already normalized key
    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }
}

/// Ordered access rules, fixed at construction
///
/// There is no way to add or remove rules afterwards; a policy change means
/// building a new set (and a new engine around it).
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<AccessRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Compile the configured rules, filling in the gate's organization and team
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        let rules = config
            .effective_rules()
            .into_iter()
            .map(|rule| {
                AccessRule::new(
                    &rule.pattern,
                    rule.organization.unwrap_or_else(|| config.organization.clone()),
                    rule.team.unwrap_or_else(|| config.team.clone()),
                    Permission::new(rule.allow_browse, rule.allow_download),
                )
            })
            .collect::<GateResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// First rule, in declared order, whose pattern matches `key`
    pub fn first_match(&self, key: &str) -> Option<&AccessRule> {
        self.rules.iter().find(|rule| rule.matches(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Prefix `key` with `delimiter` unless it already starts with one
pub fn normalize_key(key: &str, delimiter: char) -> String {
    if key.starts_with(delimiter) {
        key.to_string()
    } else {
        format!("{}{}", delimiter, key)
    }
}
