use rcl_store::StoreError;
use rcl_types::{AccountStatus, Role};

/// Reasons an actor fails the guard.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// No account is stored under the identity.
    #[error("no such user account: {identity}")]
    NotFound { identity: String },

    /// The account exists but holds a different role.
    #[error("{identity} is a {actual} while a {expected} is needed")]
    RoleMismatch {
        identity: String,
        expected: Role,
        actual: Role,
    },

    /// The account is not in `Valid` status.
    #[error("{identity} is {status}")]
    InactiveAccount {
        identity: String,
        status: AccountStatus,
    },

    /// The account record could not be read.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for guard checks.
pub type GuardResult<T> = Result<T, GuardError>;
