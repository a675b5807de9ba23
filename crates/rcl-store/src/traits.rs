use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::range::KeyRange;

/// A stored value together with the commit version that last wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: u64,
}

/// Lazy ascending cursor over `(key, value)` pairs.
pub type ScanIter<'a> = Box<dyn Iterator<Item = StoreResult<(String, VersionedValue)>> + 'a>;

/// A range a transaction scanned, with exactly what it saw.
///
/// If the scan was abandoned before reaching the end of the range, only the
/// prefix up to the last observed key is validated at commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRead {
    pub range: KeyRange,
    pub observed: Vec<(String, u64)>,
    pub exhausted: bool,
}

impl RangeRead {
    pub fn new(range: KeyRange) -> Self {
        Self {
            range,
            observed: Vec::new(),
            exhausted: false,
        }
    }

    /// The part of the range whose contents the scan actually depended on.
    pub fn validated_range(&self) -> Option<KeyRange> {
        if self.exhausted {
            return Some(self.range.clone());
        }
        let (last, _) = self.observed.last()?;
        // Smallest key strictly greater than `last`.
        Some(KeyRange::new(self.range.start.clone(), format!("{last}\0")))
    }
}

/// Everything a transaction submits at commit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Point reads: the version observed, `None` if the key was absent.
    pub reads: Vec<(String, Option<u64>)>,
    pub range_reads: Vec<RangeRead>,
    pub writes: Vec<(String, Vec<u8>)>,
}

impl ChangeSet {
    /// A single unconditional write.
    pub fn blind_write(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            writes: vec![(key.into(), value)],
            ..Default::default()
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Ordered key-value ledger consumed by the contract layer.
///
/// All implementations must satisfy these invariants:
/// - `scan` yields keys in ascending byte order and only keys inside the range.
/// - Each `scan` call is an independent cursor; dropping it releases it.
/// - `commit` is atomic: it validates the whole change set and then applies
///   every write under one new version, or applies nothing.
/// - All I/O errors are propagated, never silently ignored.
pub trait LedgerStore: Send + Sync {
    /// Read a key. Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<VersionedValue>>;

    /// Open a lazy cursor over `range`.
    fn scan(&self, range: KeyRange) -> StoreResult<ScanIter<'_>>;

    /// Validate and apply a change set, returning the new commit version.
    ///
    /// Fails with [`crate::StoreError::Conflict`] if any recorded read is stale.
    fn commit(&self, changes: ChangeSet) -> StoreResult<u64>;

    /// Unconditionally write a single key.
    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<u64> {
        self.commit(ChangeSet::blind_write(key, value))
    }
}
