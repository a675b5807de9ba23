//! Rules an actor's account must satisfy.

pub mod role;
pub mod status;

pub use role::RoleRule;
pub use status::ActiveStatusRule;

use rcl_types::{Account, Role};

use crate::error::GuardResult;

/// A single check in the guard pipeline.
///
/// Rules are pure: they see only the loaded account and the role the
/// operation requires, and they must not have side effects.
pub trait GuardRule: Send + Sync {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    fn check(&self, account: &Account, expected: Role) -> GuardResult<()>;
}
