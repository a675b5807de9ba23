use std::collections::BTreeMap;

use rcl_store::{LedgerStore, Transaction};
use rcl_types::Account;

use crate::error::GuardResult;

/// Where the guard looks accounts up.
///
/// Accounts are stored under their own id, so the lookup key is the identity.
pub trait AccountSource {
    fn load_account(&mut self, identity: &str) -> GuardResult<Option<Account>>;
}

impl<S: LedgerStore + ?Sized> AccountSource for Transaction<'_, S> {
    fn load_account(&mut self, identity: &str) -> GuardResult<Option<Account>> {
        Ok(self.get_json::<Account>(identity)?)
    }
}

impl AccountSource for BTreeMap<String, Account> {
    fn load_account(&mut self, identity: &str) -> GuardResult<Option<Account>> {
        Ok(self.get(identity).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcl_store::InMemoryLedgerStore;
    use rcl_types::Role;

    #[test]
    fn transaction_decodes_stored_accounts() {
        let store = InMemoryLedgerStore::new();
        let account = Account::valid("user4", "XX Bank", Role::Financial);
        let mut tx = Transaction::begin(&store);
        tx.put_json("user4", &account).unwrap();
        tx.commit().unwrap();

        let mut tx = Transaction::begin(&store);
        assert_eq!(tx.load_account("user4").unwrap(), Some(account));
        assert_eq!(tx.load_account("user9").unwrap(), None);
    }

    #[test]
    fn undecodable_account_is_an_error() {
        let store = InMemoryLedgerStore::new();
        store.put("user1", b"{\"id\":1}".to_vec()).unwrap();
        let mut tx = Transaction::begin(&store);
        assert!(tx.load_account("user1").is_err());
    }
}
