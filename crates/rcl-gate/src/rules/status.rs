use rcl_types::{Account, Role};

use crate::error::{GuardError, GuardResult};
use crate::rules::GuardRule;

/// The account must be `Valid`; `Frozen` and `Invalid` accounts are refused.
pub struct ActiveStatusRule;

impl GuardRule for ActiveStatusRule {
    fn name(&self) -> &str {
        "active-status"
    }

    fn check(&self, account: &Account, _expected: Role) -> GuardResult<()> {
        if account.status.is_active() {
            return Ok(());
        }
        Err(GuardError::InactiveAccount {
            identity: account.id.clone(),
            status: account.status,
        })
    }
}
