use rcl_gate::GuardError;
use rcl_store::StoreError;
use rcl_types::{AccountStatus, ReceivableStatus, Role, TypeError};

/// Every way a contract operation can fail.
///
/// Any error aborts the whole operation; nothing is written unless every
/// precondition passed and the commit was accepted.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// No record is stored under the key.
    #[error("{key} does not exist")]
    NotFound { key: String },

    #[error("{identity} is a {actual} while a {expected} is needed")]
    RoleMismatch {
        identity: String,
        expected: Role,
        actual: Role,
    },

    #[error("account {identity} is {status}")]
    InactiveAccount {
        identity: String,
        status: AccountStatus,
    },

    #[error("receivable {receivable_no} is {actual}, expected {expected}")]
    StatusMismatch {
        receivable_no: String,
        expected: ReceivableStatus,
        actual: ReceivableStatus,
    },

    /// The caller claims to hold a receivable it does not hold.
    #[error("receivable is held by {expected_owner}, not {actual}")]
    OwnershipMismatch {
        expected_owner: String,
        actual: String,
    },

    /// The caller is not the counterparty the record names.
    #[error("expected counterparty {expected}, got {actual}")]
    CounterpartyMismatch { expected: String, actual: String },

    #[error("discount apply amount {requested} exceeds order total {limit}")]
    AmountExceeded { requested: u64, limit: u64 },

    #[error("order amount must be positive, got {amount}")]
    InvalidAmount { amount: u64 },

    #[error("receivable {receivable_no} already exists")]
    DuplicateReceivable { receivable_no: String },

    #[error("no free order number after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    /// A stored record could not be decoded or encoded.
    #[error("codec error: {0}")]
    Codec(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ContractError {
    /// Returns `true` if the ledger rejected the commit because a concurrent
    /// operation touched the same keys. Such operations may be resubmitted.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::Conflict { .. }))
    }
}

impl From<GuardError> for ContractError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::NotFound { identity } => Self::NotFound { key: identity },
            GuardError::RoleMismatch {
                identity,
                expected,
                actual,
            } => Self::RoleMismatch {
                identity,
                expected,
                actual,
            },
            GuardError::InactiveAccount { identity, status } => {
                Self::InactiveAccount { identity, status }
            }
            GuardError::Store(StoreError::Serialization(msg)) => Self::Codec(msg),
            GuardError::Store(err) => Self::Store(err),
        }
    }
}

/// Result alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_errors_flatten_into_contract_taxonomy() {
        let err: ContractError = GuardError::NotFound {
            identity: "user9".into(),
        }
        .into();
        assert!(matches!(err, ContractError::NotFound { key } if key == "user9"));

        let err: ContractError = GuardError::RoleMismatch {
            identity: "user1".into(),
            expected: Role::Supplier,
            actual: Role::Company,
        }
        .into();
        assert_eq!(err.to_string(), "user1 is a Company while a Supplier is needed");
    }

    #[test]
    fn conflict_is_detectable() {
        let err = ContractError::Store(StoreError::Conflict { key: "order1".into() });
        assert!(err.is_conflict());
        assert!(!ContractError::InvalidAmount { amount: 0 }.is_conflict());
    }

    #[test]
    fn status_mismatch_message_names_both_states() {
        let err = ContractError::StatusMismatch {
            receivable_no: "rec1".into(),
            expected: ReceivableStatus::ToBeAccepted,
            actual: ReceivableStatus::Accepted,
        };
        assert_eq!(err.to_string(), "receivable rec1 is Accepted, expected To Be Accepted");
    }
}
