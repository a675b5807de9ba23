//! Foundation types for the Receivable Chain Ledger (RCL).
//!
//! This crate provides the records and value types shared by every other RCL
//! crate. It performs no I/O.
//!
//! # Key Types
//!
//! - [`Account`] -- identity record with a closed [`Role`] and [`AccountStatus`]
//! - [`RecOrder`] -- commercial obligation created by a Company
//! - [`Receivable`] -- negotiable instrument created when a Supplier signs an order
//! - [`ReceivableStatus`] -- the linear lifecycle of a receivable
//! - [`KeyPrefix`] / [`SequenceNo`] -- ledger key namespaces and dense suffixes
//! - [`LedgerTime`] -- fixed-width `YYYY-MM-DD HH:MM:SS` timestamps

pub mod account;
pub mod error;
pub mod keys;
pub mod order;
pub mod receivable;
pub mod time;

pub use account::{Account, AccountStatus, Role};
pub use error::TypeError;
pub use keys::{KeyPrefix, SequenceNo};
pub use order::RecOrder;
pub use receivable::{Receivable, ReceivableStatus};
pub use time::LedgerTime;
