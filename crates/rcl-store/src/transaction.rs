use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::range::KeyRange;
use crate::traits::{ChangeSet, LedgerStore, RangeRead, ScanIter, VersionedValue};

/// One unit of work against a [`LedgerStore`].
///
/// Reads go to the store (or to this transaction's own pending writes) and are
/// recorded; writes are buffered. [`Transaction::commit`] hands the recorded
/// reads and buffered writes to the store in a single [`ChangeSet`]. Dropping
/// a transaction without committing discards it.
pub struct Transaction<'s, S: LedgerStore + ?Sized> {
    store: &'s S,
    reads: BTreeMap<String, Option<u64>>,
    range_reads: Vec<RangeRead>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl<'s, S: LedgerStore + ?Sized> Transaction<'s, S> {
    pub fn begin(store: &'s S) -> Self {
        Self {
            store,
            reads: BTreeMap::new(),
            range_reads: Vec::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Read a key, seeing this transaction's own writes first.
    pub fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(pending) = self.writes.get(key) {
            return Ok(Some(pending.clone()));
        }
        let entry = self.store.get(key)?;
        self.reads
            .entry(key.to_string())
            .or_insert(entry.as_ref().map(|e| e.version));
        Ok(entry.map(|e| e.value))
    }

    /// Returns `true` if the key exists (recorded as a read).
    pub fn contains(&mut self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Buffer a write. Nothing reaches the store until commit.
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.writes.insert(key.into(), value);
    }

    /// Read and decode a JSON value.
    pub fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> StoreResult<Option<T>> {
        match self.get(key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization(format!("{key}: {e}"))),
            None => Ok(None),
        }
    }

    /// Encode and buffer a JSON value.
    pub fn put_json<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> StoreResult<()> {
        let key = key.into();
        let bytes = serde_json::to_vec(value)
            .map_err(|e| StoreError::Serialization(format!("{key}: {e}")))?;
        self.put(key, bytes);
        Ok(())
    }

    /// Open a lazy cursor over `range`, merged with pending writes.
    ///
    /// The keys the cursor yields from the store are recorded so that a
    /// concurrent insert into the scanned part of the range fails this
    /// transaction's commit.
    pub fn scan(&mut self, range: KeyRange) -> StoreResult<TxScan<'_>> {
        let inner = self.store.scan(range.clone())?;
        let pending = self
            .writes
            .iter()
            .filter(|(key, _)| range.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Vec<_>>();
        self.range_reads.push(RangeRead::new(range));
        let last = self.range_reads.len() - 1;
        Ok(TxScan {
            inner,
            head: None,
            inner_done: false,
            pending,
            pending_pos: 0,
            record: &mut self.range_reads[last],
        })
    }

    /// Number of buffered writes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Submit the transaction. Returns the store's commit version.
    pub fn commit(self) -> StoreResult<u64> {
        let changes = ChangeSet {
            reads: self.reads.into_iter().collect(),
            range_reads: self.range_reads,
            writes: self.writes.into_iter().collect(),
        };
        debug!(
            reads = changes.reads.len(),
            ranges = changes.range_reads.len(),
            writes = changes.writes.len(),
            "committing transaction"
        );
        self.store.commit(changes)
    }
}

/// Cursor returned by [`Transaction::scan`].
pub struct TxScan<'t> {
    inner: ScanIter<'t>,
    head: Option<(String, VersionedValue)>,
    inner_done: bool,
    pending: Vec<(String, Vec<u8>)>,
    pending_pos: usize,
    record: &'t mut RangeRead,
}

impl Iterator for TxScan<'_> {
    type Item = StoreResult<(String, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.head.is_none() && !self.inner_done {
            match self.inner.next() {
                Some(Ok(entry)) => self.head = Some(entry),
                Some(Err(err)) => return Some(Err(err)),
                None => self.inner_done = true,
            }
        }

        let order = match (&self.head, self.pending.get(self.pending_pos)) {
            (None, None) => {
                self.record.exhausted = true;
                return None;
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((stored, _)), Some((pending, _))) => stored.cmp(pending),
        };

        if order != Ordering::Greater {
            let (key, entry) = self.head.take()?;
            self.record.observed.push((key.clone(), entry.version));
            if order == Ordering::Less {
                return Some(Ok((key, entry.value)));
            }
        }
        let (key, value) = self.pending.get(self.pending_pos)?.clone();
        self.pending_pos += 1;
        Some(Ok((key, value)))
    }
}
