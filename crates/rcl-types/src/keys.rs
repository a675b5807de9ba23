//! Ledger key namespaces.
//!
//! Every record lives under `"{prefix}{n}"` where `n` is a dense decimal
//! suffix starting at 1. Orders, goods and receivables created together share
//! the same suffix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Namespace prefix of a ledger key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyPrefix {
    User,
    Order,
    Goods,
    Receivable,
}

impl KeyPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Order => "order",
            Self::Goods => "goods",
            Self::Receivable => "rec",
        }
    }

    /// Format the key for sequence number `n`.
    pub fn key(&self, n: u64) -> String {
        format!("{}{n}", self.as_str())
    }

    /// Parse the dense decimal suffix of `key`.
    ///
    /// Returns `None` unless `key` is exactly this prefix followed by ASCII
    /// digits without a leading zero.
    pub fn parse_suffix(&self, key: &str) -> Option<u64> {
        let digits = key.strip_prefix(self.as_str())?;
        if digits.is_empty() || digits.starts_with('0') {
            return None;
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dense, 1-based sequence number shared by an order and its derived keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNo(u64);

impl SequenceNo {
    pub fn new(n: u64) -> Result<Self, TypeError> {
        if n == 0 {
            return Err(TypeError::ZeroSequence);
        }
        Ok(Self(n))
    }

    pub fn first() -> Self {
        Self(1)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The following sequence number, saturating at `u64::MAX`.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn order_no(&self) -> String {
        KeyPrefix::Order.key(self.0)
    }

    pub fn goods_no(&self) -> String {
        KeyPrefix::Goods.key(self.0)
    }

    pub fn receivable_no(&self) -> String {
        KeyPrefix::Receivable.key(self.0)
    }
}

impl fmt::Display for SequenceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
