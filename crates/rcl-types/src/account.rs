use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Capacity in which an identity participates in the receivable lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Issues orders and ultimately pays the receivable.
    Company,
    /// Signs orders into receivables and may transfer them.
    Supplier,
    /// Discounts receivables before maturity.
    Financial,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Company, Role::Supplier, Role::Financial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Supplier => "Supplier",
            Self::Financial => "Financial",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeError::UnknownRole(s.to_string()))
    }
}

/// Administrative state of an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Invalid,
    Valid,
    Frozen,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Valid => "Valid",
            Self::Frozen => "Frozen",
        }
    }

    /// Returns `true` only for [`AccountStatus::Valid`].
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Invalid, Self::Valid, Self::Frozen]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeError::UnknownAccountStatus(s.to_string()))
    }
}

/// Identity record stored under its `id` key.
///
/// Accounts are written at ledger bootstrap and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub enterprise: String,
    pub role: Role,
    pub status: AccountStatus,
    pub cert_no: String,
    pub acct_svcr_name: String,
}

impl Account {
    /// Build a `Valid` account with descriptor strings derived from its id.
    pub fn valid(id: impl Into<String>, enterprise: impl Into<String>, role: Role) -> Self {
        let id = id.into();
        Self {
            cert_no: format!("cert number for {id}"),
            acct_svcr_name: format!("account service bank name for {id}"),
            enterprise: enterprise.into(),
            role,
            status: AccountStatus::Valid,
            id,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
