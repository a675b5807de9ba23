use tracing::{debug, info, warn};

use rcl_gate::{RoleGuard, VerifiedActor};
use rcl_store::{LedgerStore, Transaction};
use rcl_types::{Account, KeyPrefix, RecOrder, Receivable, Role};

use crate::bootstrap;
use crate::clock::{Clock, SystemClock};
use crate::config::ContractConfig;
use crate::error::ContractResult;
use crate::query::{self, QueryResult};

/// The receivable contract bound to a ledger store.
///
/// Every public mutating operation runs in its own transaction and either
/// commits all of its writes or none. The `*_in` variants run inside a
/// caller-owned [`Transaction`] and leave committing to the caller.
pub struct ReceivableContract<S: LedgerStore> {
    pub(crate) store: S,
    pub(crate) guard: RoleGuard,
    pub(crate) config: ContractConfig,
    pub(crate) clock: Box<dyn Clock>,
}

impl<S: LedgerStore> ReceivableContract<S> {
    pub fn new(store: S, config: ContractConfig) -> Self {
        Self {
            store,
            guard: RoleGuard::new(config.guard.clone()),
            config,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for signing timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Open a transaction for the `*_in` operations.
    pub fn begin(&self) -> Transaction<'_, S> {
        Transaction::begin(&self.store)
    }

    // ---- Bootstrap ----

    /// Seed the genesis accounts.
    pub fn init_ledger(&self) -> ContractResult<Vec<Account>> {
        let accounts = self.execute("init_ledger", bootstrap::seed_accounts)?;
        info!(accounts = accounts.len(), "ledger initialised");
        Ok(accounts)
    }

    // ---- Queries ----

    pub fn query_user(&self, user_id: &str) -> ContractResult<Account> {
        self.read(|tx| query::get_one(tx, user_id))
    }

    pub fn query_all_users(&self) -> ContractResult<Vec<QueryResult<Account>>> {
        self.read(|tx| query::scan_all(tx, KeyPrefix::User, self.config.scan))
    }

    pub fn query_rec_order(&self, order_no: &str) -> ContractResult<RecOrder> {
        self.read(|tx| query::get_one(tx, order_no))
    }

    pub fn query_all_rec_orders(&self) -> ContractResult<Vec<QueryResult<RecOrder>>> {
        self.read(|tx| query::scan_all(tx, KeyPrefix::Order, self.config.scan))
    }

    pub fn query_receivable(&self, receivable_no: &str) -> ContractResult<Receivable> {
        self.read(|tx| query::get_one(tx, receivable_no))
    }

    pub fn query_all_receivables(&self) -> ContractResult<Vec<QueryResult<Receivable>>> {
        self.read(|tx| query::scan_all(tx, KeyPrefix::Receivable, self.config.scan))
    }

    // ---- Plumbing ----

    /// Run `work` in a fresh transaction and commit it if it succeeded.
    pub(crate) fn execute<T, F>(&self, op: &'static str, work: F) -> ContractResult<T>
    where
        F: FnOnce(&mut Transaction<'_, S>) -> ContractResult<T>,
    {
        let mut tx = Transaction::begin(&self.store);
        let outcome = work(&mut tx).and_then(|value| {
            let version = tx.commit()?;
            debug!(op, version, "committed");
            Ok(value)
        });
        if let Err(err) = &outcome {
            warn!(op, error = %err, "operation aborted");
        }
        outcome
    }

    /// Run read-only `work`; nothing is committed.
    fn read<T, F>(&self, work: F) -> ContractResult<T>
    where
        F: FnOnce(&mut Transaction<'_, S>) -> ContractResult<T>,
    {
        let mut tx = Transaction::begin(&self.store);
        work(&mut tx)
    }

    pub(crate) fn verify(
        &self,
        tx: &mut Transaction<'_, S>,
        identity: &str,
        role: Role,
    ) -> ContractResult<VerifiedActor> {
        Ok(self.guard.check(tx, identity, role)?)
    }
}

impl<S: LedgerStore + Default> Default for ReceivableContract<S> {
    fn default() -> Self {
        Self::new(S::default(), ContractConfig::default())
    }
}

impl<S: LedgerStore + std::fmt::Debug> std::fmt::Debug for ReceivableContract<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceivableContract")
            .field("store", &self.store)
            .field("guard", &self.guard)
            .field("config", &self.config)
            .finish()
    }
}
