use thiserror::Error;

/// Errors produced by type parsing and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown account status: {0}")]
    UnknownAccountStatus(String),

    #[error("unknown receivable status: {0}")]
    UnknownReceivableStatus(String),

    #[error("invalid ledger time {value:?}: expected YYYY-MM-DD HH:MM:SS")]
    InvalidTime { value: String },

    #[error("ledger time overflow adding {months} months")]
    TimeOverflow { months: u32 },

    #[error("sequence numbers start at 1")]
    ZeroSequence,
}
