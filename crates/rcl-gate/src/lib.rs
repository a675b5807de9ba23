//! Authorization guard for the Receivable Chain Ledger.
//!
//! Every mutating contract operation names one or more actors. Before the
//! operation touches its target record, each named actor is passed through the
//! [`RoleGuard`]: the account is loaded from an [`AccountSource`] and run
//! through a fail-fast pipeline of [`GuardRule`]s. The only way to obtain a
//! [`VerifiedActor`] is for every rule to pass; there is no boolean flag to
//! forget to check.
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use rcl_gate::{GuardConfig, RoleGuard};
//! use rcl_types::{Account, Role};
//!
//! let mut accounts = BTreeMap::new();
//! accounts.insert("user1".to_string(), Account::valid("user1", "Acme", Role::Company));
//!
//! let guard = RoleGuard::new(GuardConfig::default());
//! let actor = guard.check(&mut accounts, "user1", Role::Company).unwrap();
//! assert_eq!(actor.id(), "user1");
//! assert!(guard.check(&mut accounts, "user1", Role::Supplier).is_err());
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod rules;
pub mod source;

pub use config::{AcceptPolicy, DiscountConfirmPolicy, GuardConfig};
pub use error::{GuardError, GuardResult};
pub use guard::{RoleGuard, VerifiedActor};
pub use rules::{ActiveStatusRule, GuardRule, RoleRule};
pub use source::AccountSource;
