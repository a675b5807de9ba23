use rcl_types::{Account, Role};

use crate::error::{GuardError, GuardResult};
use crate::rules::GuardRule;

/// The account must hold exactly the role the operation requires.
pub struct RoleRule;

impl GuardRule for RoleRule {
    fn name(&self) -> &str {
        "role"
    }

    fn check(&self, account: &Account, expected: Role) -> GuardResult<()> {
        if account.has_role(expected) {
            return Ok(());
        }
        Err(GuardError::RoleMismatch {
            identity: account.id.clone(),
            expected,
            actual: account.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_role_passes() {
        let account = Account::valid("user2", "First Supplier", Role::Supplier);
        assert!(RoleRule.check(&account, Role::Supplier).is_ok());
    }

    #[test]
    fn mismatch_reports_both_roles() {
        let account = Account::valid("user2", "First Supplier", Role::Supplier);
        let err = RoleRule.check(&account, Role::Financial).unwrap_err();
        assert!(matches!(
            &err,
            GuardError::RoleMismatch { identity, expected: Role::Financial, actual: Role::Supplier }
                if identity == "user2"
        ));
        assert_eq!(err.to_string(), "user2 is a Supplier while a Financial is needed");
    }
}
