//! Rule engine
//!
//! Resolves `(username, resource key)` to a [`Permission`]:
//!
//! 1. normalize the key to start with the delimiter
//! 2. take the first rule whose pattern matches
//! 3. find the rule's team in its organization
//! 4. require an active membership of the user in that team
//!
//! Each step either yields the input of the next one or a named [`AccessError`].

use std::sync::Arc;

use super::directory::{DirectoryService, MembershipState, Team};
use super::rule::{normalize_key, AccessRule, Permission, RuleSet};
use crate::core::{AccessError, AccessResult, GateConfig, GateResult, DEFAULT_DELIMITER};

/// Resolves permissions against an immutable rule set and a directory service
pub struct RuleEngine {
    rules: RuleSet,
    directory: Arc<dyn DirectoryService>,
    delimiter: char,
}

impl RuleEngine {
    /// Create an engine over prepared rules using the default delimiter
    pub fn new(rules: RuleSet, directory: Arc<dyn DirectoryService>) -> Self {
        Self {
            rules,
            directory,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Create an engine from configuration
    pub fn from_config(config: &GateConfig, directory: Arc<dyn DirectoryService>) -> GateResult<Self> {
        let rules = RuleSet::from_config(config)?;
        tracing::info!(
            "Loaded {} access rule(s), checking teams via {}",
            rules.len(),
            directory.directory_name()
        );

        Ok(Self {
            rules,
            directory,
            delimiter: config.delimiter,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Resolve the permission of `username` on `resource_key`
    ///
    /// Keys with and without a leading delimiter resolve identically. Issues at
    /// most two directory calls, one after the other, and never caches.
    pub async fn resolve_permission(&self, username: &str, resource_key: &str) -> AccessResult<Permission> {
        let key = normalize_key(resource_key, self.delimiter);

        let rule = self
            .rules
            .first_match(&key)
            .ok_or_else(|| AccessError::NoMatchingRule { key: key.clone() })?;

        tracing::debug!(
            "Key {} matched rule {} ({}/{})",
            key,
            rule.pattern(),
            rule.organization(),
            rule.team()
        );

        let team = self.find_team(rule).await?;
        let state = self.membership_state(username, rule, &team).await?;

        if !state.is_active() {
            tracing::warn!(
                "Denied {} on {}: membership in {} is {}",
                username,
                key,
                rule.team(),
                state
            );
            return Err(AccessError::MembershipNotActive {
                username: username.to_string(),
                team: rule.team().to_string(),
                state: state.to_string(),
            });
        }

        tracing::info!(
            "Granted {} on {}: browse={} download={}",
            username,
            key,
            rule.permission().allow_browse,
            rule.permission().allow_download
        );
        Ok(rule.permission())
    }

    async fn find_team(&self, rule: &AccessRule) -> AccessResult<Team> {
        let teams = self
            .directory
            .list_teams(rule.organization())
            .await
            .map_err(|e| {
                tracing::warn!("Team lookup in {} failed: {:#}", rule.organization(), e);
                AccessError::OrganizationLookupFailed {
                    organization: rule.organization().to_string(),
                    reason: format!("{:#}", e),
                }
            })?;

        let wanted = rule.team().to_lowercase();
        teams
            .into_iter()
            .find(|team| team.name.to_lowercase() == wanted)
            .ok_or_else(|| AccessError::TeamNotFound {
                organization: rule.organization().to_string(),
                team: rule.team().to_string(),
            })
    }

    async fn membership_state(
        &self,
        username: &str,
        rule: &AccessRule,
        team: &Team,
    ) -> AccessResult<MembershipState> {
        self.directory
            .membership_state(username, team.id)
            .await
            .map_err(|e| {
                tracing::warn!("Membership lookup of {} in {} failed: {:#}", username, team.name, e);
                AccessError::MembershipLookupFailed {
                    username: username.to_string(),
                    team: rule.team().to_string(),
                    reason: format!("{:#}", e),
                }
            })
    }
}
