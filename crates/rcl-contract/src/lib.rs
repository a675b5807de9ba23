//! The receivable contract of the Receivable Chain Ledger.
//!
//! A Company issues an order to a Supplier; the Supplier signs it into a
//! receivable; the receivable is accepted, may change hands between
//! suppliers, is discounted by a Financial institution, and is finally
//! redeemed by the Company that owes it.
//!
//! [`ReceivableContract`] exposes every operation over any
//! [`rcl_store::LedgerStore`]. Each operation runs as one transaction:
//! actors are verified through [`rcl_gate::RoleGuard`], the target is
//! loaded and validated, and the rewritten record is committed atomically.
//! Concurrent operations that touch the same keys are rejected at commit
//! (see [`ContractError::is_conflict`]); nothing is retried internally.
//!
//! # Quick Start
//!
//! ```rust
//! use rcl_contract::{ContractConfig, ReceivableContract};
//! use rcl_store::InMemoryLedgerStore;
//! use rcl_types::ReceivableStatus;
//!
//! let contract = ReceivableContract::new(InMemoryLedgerStore::new(), ContractConfig::default());
//! contract.init_ledger().unwrap();
//!
//! let order = contract.create_order("user1", "user2", 1_000_000).unwrap();
//! assert_eq!(order.order_no, "order1");
//!
//! let rec = contract.sign_receivable(&order.order_no, "user2", 900_000).unwrap();
//! assert_eq!(rec.status, ReceivableStatus::ToBeAccepted);
//! ```

pub mod allocator;
pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod contract;
pub mod error;
pub mod query;
pub mod workflow;

pub use allocator::ORDER_COUNTER_KEY;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AllocationStrategy, ContractConfig, ScanMode};
pub use contract::ReceivableContract;
pub use error::{ContractError, ContractResult};
pub use query::QueryResult;
