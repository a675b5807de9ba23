//! Point reads and namespace listings.
//!
//! Listings are served from a single store cursor per call. Under
//! [`ScanMode::Bounded`] records are decoded lazily as the caller pulls them;
//! [`ScanMode::Numeric`] has to see the whole namespace before it can order
//! it, so it buffers matching keys first.

use serde::de::DeserializeOwned;
use serde::Serialize;

use rcl_store::{KeyRange, LedgerStore, StoreError, Transaction};
use rcl_types::KeyPrefix;

use crate::config::ScanMode;
use crate::error::{ContractError, ContractResult};

/// One entry of a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryResult<T> {
    pub key: String,
    pub record: T,
}

/// Lazy sequence of decoded listing entries.
pub type RecordScan<'t, T> = Box<dyn Iterator<Item = ContractResult<QueryResult<T>>> + 't>;

/// The key range a listing of `prefix` covers under `mode`.
pub fn listing_range(prefix: KeyPrefix, mode: ScanMode) -> KeyRange {
    match mode {
        ScanMode::Bounded => KeyRange::new(format!("{prefix}0"), format!("{prefix}99")),
        ScanMode::Numeric => KeyRange::prefix(prefix.as_str()),
    }
}

/// Load and decode the record at `key`, failing with `NotFound` if absent.
pub fn get_one<S, T>(tx: &mut Transaction<'_, S>, key: &str) -> ContractResult<T>
where
    S: LedgerStore + ?Sized,
    T: DeserializeOwned,
{
    match tx.get(key)? {
        Some(bytes) => decode(key, &bytes),
        None => Err(ContractError::NotFound {
            key: key.to_string(),
        }),
    }
}

/// Encode `record` and buffer it for writing at `key`.
pub fn put_one<S, T>(tx: &mut Transaction<'_, S>, key: &str, record: &T) -> ContractResult<()>
where
    S: LedgerStore + ?Sized,
    T: Serialize,
{
    tx.put_json(key, record).map_err(|err| match err {
        StoreError::Serialization(msg) => ContractError::Codec(msg),
        other => ContractError::Store(other),
    })
}

/// Open a listing of `prefix`, decoding each value as `T`.
///
/// A value that fails to decode is reported as an error item, never skipped.
pub fn scan_range<'t, 's: 't, S, T>(
    tx: &'t mut Transaction<'s, S>,
    prefix: KeyPrefix,
    mode: ScanMode,
) -> ContractResult<RecordScan<'t, T>>
where
    S: LedgerStore + ?Sized,
    T: DeserializeOwned + 't,
{
    let cursor = tx.scan(listing_range(prefix, mode))?;
    match mode {
        ScanMode::Bounded => Ok(Box::new(cursor.map(|item| -> ContractResult<QueryResult<T>> {
            let (key, bytes) = item?;
            let record = decode(&key, &bytes)?;
            Ok(QueryResult { key, record })
        }))),
        ScanMode::Numeric => {
            let mut numbered = Vec::new();
            for item in cursor {
                let (key, bytes) = item?;
                if let Some(n) = prefix.parse_suffix(&key) {
                    numbered.push((n, key, bytes));
                }
            }
            numbered.sort_by_key(|(n, _, _)| *n);
            Ok(Box::new(numbered.into_iter().map(|(_, key, bytes)| -> ContractResult<QueryResult<T>> {
                let record = decode(&key, &bytes)?;
                Ok(QueryResult { key, record })
            })))
        }
    }
}

/// Collect a full listing of `prefix`.
pub fn scan_all<S, T>(
    tx: &mut Transaction<'_, S>,
    prefix: KeyPrefix,
    mode: ScanMode,
) -> ContractResult<Vec<QueryResult<T>>>
where
    S: LedgerStore + ?Sized,
    T: DeserializeOwned,
{
    scan_range(tx, prefix, mode)?.collect()
}

/// Number of keys a listing of `prefix` would return, without decoding.
pub fn count_keys<S>(tx: &mut Transaction<'_, S>, prefix: KeyPrefix, mode: ScanMode) -> ContractResult<u64>
where
    S: LedgerStore + ?Sized,
{
    let mut count = 0u64;
    for item in tx.scan(listing_range(prefix, mode))? {
        let (key, _) = item?;
        if mode == ScanMode::Bounded || prefix.parse_suffix(&key).is_some() {
            count += 1;
        }
    }
    Ok(count)
}

/// Highest dense suffix present in the `prefix` namespace (0 when empty).
pub fn highest_suffix<S>(tx: &mut Transaction<'_, S>, prefix: KeyPrefix) -> ContractResult<u64>
where
    S: LedgerStore + ?Sized,
{
    let mut highest = 0;
    for item in tx.scan(KeyRange::prefix(prefix.as_str()))? {
        let (key, _) = item?;
        if let Some(n) = prefix.parse_suffix(&key) {
            highest = highest.max(n);
        }
    }
    Ok(highest)
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> ContractResult<T> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::Codec(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcl_store::InMemoryLedgerStore;
    use rcl_types::{Account, Role};

    fn store_with_users(ids: &[&str]) -> InMemoryLedgerStore {
        let store = InMemoryLedgerStore::new();
        let mut tx = Transaction::begin(&store);
        for id in ids {
            tx.put_json(*id, &Account::valid(*id, "Acme", Role::Supplier)).unwrap();
        }
        tx.commit().unwrap();
        store
    }

    fn listed_keys(store: &InMemoryLedgerStore, mode: ScanMode) -> Vec<String> {
        let mut tx = Transaction::begin(store);
        scan_all::<_, Account>(&mut tx, KeyPrefix::User, mode)
            .unwrap()
            .into_iter()
            .map(|r| r.key)
            .collect()
    }

    #[test]
    fn bounded_listing_orders_lexicographically() {
        let store = store_with_users(&["user1", "user2", "user10", "user99", "user100"]);
        assert_eq!(
            listed_keys(&store, ScanMode::Bounded),
            vec!["user1", "user10", "user100", "user2"]
        );
    }

    #[test]
    fn numeric_listing_orders_by_suffix_without_ceiling() {
        let store = store_with_users(&["user1", "user2", "user10", "user99", "user100", "user01"]);
        assert_eq!(
            listed_keys(&store, ScanMode::Numeric),
            vec!["user1", "user2", "user10", "user99", "user100"]
        );
    }

    #[test]
    fn bounded_scan_is_lazy() {
        let store = store_with_users(&["user1", "user2"]);
        store.put("user3", b"garbage".to_vec()).unwrap();
        let mut tx = Transaction::begin(&store);
        let mut scan = scan_range::<_, Account>(&mut tx, KeyPrefix::User, ScanMode::Bounded).unwrap();
        // The undecodable record is only reached on the third pull.
        assert_eq!(scan.next().unwrap().unwrap().key, "user1");
        assert_eq!(scan.next().unwrap().unwrap().key, "user2");
        assert!(matches!(scan.next(), Some(Err(ContractError::Codec(_)))));
    }

    #[test]
    fn undecodable_record_fails_the_listing() {
        let store = store_with_users(&["user1"]);
        store.put("user2", b"{}".to_vec()).unwrap();
        let mut tx = Transaction::begin(&store);
        assert!(scan_all::<_, Account>(&mut tx, KeyPrefix::User, ScanMode::Bounded).is_err());
    }

    #[test]
    fn get_one_reports_missing_key() {
        let store = store_with_users(&["user1"]);
        let mut tx = Transaction::begin(&store);
        let account: Account = get_one(&mut tx, "user1").unwrap();
        assert_eq!(account.id, "user1");
        assert!(matches!(
            get_one::<_, Account>(&mut tx, "user5"),
            Err(ContractError::NotFound { key }) if key == "user5"
        ));
    }

    #[test]
    fn counts_and_highest_suffix() {
        let store = store_with_users(&["user1", "user7", "user99"]);
        let mut tx = Transaction::begin(&store);
        assert_eq!(count_keys(&mut tx, KeyPrefix::User, ScanMode::Bounded).unwrap(), 2);
        assert_eq!(count_keys(&mut tx, KeyPrefix::User, ScanMode::Numeric).unwrap(), 3);
        assert_eq!(highest_suffix(&mut tx, KeyPrefix::User).unwrap(), 99);
        assert_eq!(highest_suffix(&mut tx, KeyPrefix::Order).unwrap(), 0);
    }
}
