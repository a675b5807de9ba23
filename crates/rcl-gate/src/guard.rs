use tracing::{debug, warn};

use rcl_types::{Account, Role};

use crate::config::GuardConfig;
use crate::error::{GuardError, GuardResult};
use crate::rules::{ActiveStatusRule, GuardRule, RoleRule};
use crate::source::AccountSource;

// ---------------------------------------------------------------------------
// VerifiedActor
// ---------------------------------------------------------------------------

/// Proof that an identity exists and passed every guard rule for `role`.
///
/// Only [`RoleGuard::check`] can construct one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedActor {
    account: Account,
    role: Role,
}

impl VerifiedActor {
    pub fn id(&self) -> &str {
        &self.account.id
    }

    /// The role the actor was verified for.
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn into_account(self) -> Account {
        self.account
    }
}

// ---------------------------------------------------------------------------
// RoleGuard
// ---------------------------------------------------------------------------

/// Fail-fast pipeline of [`GuardRule`]s applied to a named actor.
pub struct RoleGuard {
    rules: Vec<Box<dyn GuardRule>>,
    config: GuardConfig,
}

impl RoleGuard {
    /// Build the standard pipeline for `config`:
    /// Role -> ActiveStatus (when `require_valid_status` is set).
    pub fn new(config: GuardConfig) -> Self {
        let mut guard = Self {
            rules: Vec::new(),
            config,
        };
        guard.add_rule(Box::new(RoleRule));
        if guard.config.require_valid_status {
            guard.add_rule(Box::new(ActiveStatusRule));
        }
        guard
    }

    /// Append a rule to the end of the pipeline.
    pub fn add_rule(&mut self, rule: Box<dyn GuardRule>) {
        self.rules.push(rule);
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Load `identity` and verify it may act as `expected`.
    pub fn check<A>(&self, source: &mut A, identity: &str, expected: Role) -> GuardResult<VerifiedActor>
    where
        A: AccountSource + ?Sized,
    {
        let Some(account) = source.load_account(identity)? else {
            warn!(identity, role = %expected, "guard rejected unknown identity");
            return Err(GuardError::NotFound {
                identity: identity.to_string(),
            });
        };

        for rule in &self.rules {
            if let Err(err) = rule.check(&account, expected) {
                warn!(identity, role = %expected, rule = rule.name(), error = %err, "guard rejected actor");
                return Err(err);
            }
        }

        debug!(identity, role = %expected, "actor verified");
        Ok(VerifiedActor {
            account,
            role: expected,
        })
    }
}

impl Default for RoleGuard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

impl std::fmt::Debug for RoleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("RoleGuard")
            .field("rules", &names)
            .field("config", &self.config)
            .finish()
    }
}
