//! Ordered key-value ledger storage for the Receivable Chain Ledger.
//!
//! The contract layer never talks to a database directly. It runs every
//! public operation inside a [`Transaction`] over a [`LedgerStore`], the
//! same shape a permissioned ledger peer exposes to chaincode: point get,
//! buffered put, and ordered range scans.
//!
//! # Storage Backends
//!
//! All backends implement the [`LedgerStore`] trait:
//!
//! - [`InMemoryLedgerStore`] -- `BTreeMap`-based MVCC store for tests and
//!   embedding, with JSON snapshot persistence
//!
//! # Design Rules
//!
//! 1. Nothing reaches the store until [`Transaction::commit`].
//! 2. A commit either applies every write or none of them.
//! 3. Commits are validated optimistically: if any key the transaction read,
//!    or any range it scanned, changed since it was read, the commit fails
//!    with [`StoreError::Conflict`].
//! 4. Range scans are lazy cursors; dropping one releases it.
//! 5. The store never interprets values -- it is a pure byte store.

pub mod error;
pub mod memory;
pub mod range;
pub mod traits;
pub mod transaction;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryLedgerStore;
pub use range::KeyRange;
pub use traits::{ChangeSet, LedgerStore, RangeRead, ScanIter, VersionedValue};
pub use transaction::{Transaction, TxScan};
