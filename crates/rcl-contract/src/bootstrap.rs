use rcl_store::{LedgerStore, Transaction};
use rcl_types::{Account, Role};

use crate::error::ContractResult;
use crate::query;

/// The accounts a fresh ledger starts with.
pub fn genesis_accounts() -> Vec<Account> {
    vec![
        Account::valid("user1", "Qulian Technology", Role::Company),
        Account::valid("user2", "First Supplier", Role::Supplier),
        Account::valid("user3", "Second Supplier", Role::Supplier),
        Account::valid("user4", "XX Bank", Role::Financial),
    ]
}

/// Buffer the genesis accounts into `tx`. Re-running rewrites identical records.
pub fn seed_accounts<S>(tx: &mut Transaction<'_, S>) -> ContractResult<Vec<Account>>
where
    S: LedgerStore + ?Sized,
{
    let accounts = genesis_accounts();
    for account in &accounts {
        query::put_one(tx, &account.id, account)?;
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcl_store::InMemoryLedgerStore;
    use rcl_types::AccountStatus;

    #[test]
    fn genesis_covers_every_role() {
        let accounts = genesis_accounts();
        for role in Role::ALL {
            assert!(accounts.iter().any(|a| a.role == role));
        }
        assert!(accounts.iter().all(|a| a.status == AccountStatus::Valid));
        assert_eq!(accounts[3].cert_no, "cert number for user4");
        assert_eq!(accounts[3].acct_svcr_name, "account service bank name for user4");
    }

    #[test]
    fn seeding_writes_accounts_only() {
        let store = InMemoryLedgerStore::new();
        let mut tx = Transaction::begin(&store);
        seed_accounts(&mut tx).unwrap();
        tx.commit().unwrap();
        assert_eq!(store.len(), 4);
        assert!(store.get("order1").unwrap().is_none());
    }
}
