use std::collections::BTreeMap;
use std::io::Write;
use std::ops::Bound;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::range::KeyRange;
use crate::traits::{ChangeSet, LedgerStore, ScanIter, VersionedValue};

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<String, VersionedValue>,
    version: u64,
}

/// In-memory, `BTreeMap`-based MVCC ledger store.
///
/// Intended for tests, embedding, and the CLI (via [`Self::load`] /
/// [`Self::save`]). Every commit bumps a store-wide version and stamps it on
/// each key it writes; transactions use those stamps for conflict detection.
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
}

impl InMemoryLedgerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The version of the most recent commit (0 for a fresh store).
    pub fn version(&self) -> u64 {
        self.state.read().map(|s| s.version).unwrap_or(0)
    }

    /// Load a JSON snapshot written by [`Self::save`].
    ///
    /// A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot found, starting empty");
            return Ok(Self::new());
        }
        let raw = std::fs::read_to_string(path)?;
        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let entries = snapshot
            .entries
            .into_iter()
            .map(|(key, entry)| {
                let value = VersionedValue {
                    value: entry.value.into_bytes(),
                    version: entry.version,
                };
                (key, value)
            })
            .collect::<BTreeMap<_, _>>();
        debug!(path = %path.display(), keys = entries.len(), version = snapshot.version, "snapshot loaded");
        Ok(Self {
            state: RwLock::new(State {
                entries,
                version: snapshot.version,
            }),
        })
    }

    /// Atomically persist the store as a JSON snapshot.
    ///
    /// The snapshot is written to a temporary file beside `path` and renamed
    /// into place, so a crash never leaves a truncated snapshot behind.
    pub fn save(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let snapshot = {
            let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
            let mut entries = BTreeMap::new();
            for (key, entry) in &state.entries {
                let value = String::from_utf8(entry.value.clone()).map_err(|_| {
                    StoreError::Serialization(format!("value at {key} is not UTF-8"))
                })?;
                entries.insert(
                    key.clone(),
                    SnapshotEntry {
                        version: entry.version,
                        value,
                    },
                );
            }
            Snapshot {
                version: state.version,
                entries,
            }
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %path.display(), version = snapshot.version, "snapshot saved");
        Ok(())
    }

    fn validate(state: &State, changes: &ChangeSet) -> StoreResult<()> {
        for (key, seen) in &changes.reads {
            let current = state.entries.get(key).map(|e| e.version);
            if current != *seen {
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }
        for read in &changes.range_reads {
            let Some(range) = read.validated_range() else {
                continue;
            };
            let mut observed = read.observed.iter();
            for (key, entry) in range_of(&state.entries, &range, None) {
                match observed.next() {
                    Some((seen_key, seen_version))
                        if seen_key == key && *seen_version == entry.version => {}
                    Some((seen_key, _)) if seen_key < key => {
                        // A key the scan saw has since been removed.
                        return Err(StoreError::Conflict {
                            key: seen_key.clone(),
                        });
                    }
                    _ => return Err(StoreError::Conflict { key: key.clone() }),
                }
            }
            if let Some((seen_key, _)) = observed.next() {
                return Err(StoreError::Conflict {
                    key: seen_key.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Entries of `map` inside `range`, strictly after `after` when given.
fn range_of<'a>(
    map: &'a BTreeMap<String, VersionedValue>,
    range: &KeyRange,
    after: Option<&str>,
) -> Box<dyn Iterator<Item = (&'a String, &'a VersionedValue)> + 'a> {
    if range.is_empty() {
        return Box::new(std::iter::empty());
    }
    let lower = match after {
        Some(key) if key >= range.start.as_str() => Bound::Excluded(key.to_string()),
        _ => Bound::Included(range.start.clone()),
    };
    let upper = match &range.end {
        Some(end) => Bound::Excluded(end.clone()),
        None => Bound::Unbounded,
    };
    if let (Bound::Excluded(lo), Bound::Excluded(hi)) = (&lower, &upper) {
        if lo >= hi {
            return Box::new(std::iter::empty());
        }
    }
    Box::new(map.range((lower, upper)))
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get(&self, key: &str) -> StoreResult<Option<VersionedValue>> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.entries.get(key).cloned())
    }

    fn scan(&self, range: KeyRange) -> StoreResult<ScanIter<'_>> {
        Ok(Box::new(MemoryCursor {
            store: self,
            range,
            last: None,
            done: false,
        }))
    }

    fn commit(&self, changes: ChangeSet) -> StoreResult<u64> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        if let Err(err) = Self::validate(&state, &changes) {
            warn!(error = %err, "commit rejected");
            return Err(err);
        }
        if changes.is_read_only() {
            return Ok(state.version);
        }
        state.version += 1;
        let version = state.version;
        let count = changes.writes.len();
        for (key, value) in changes.writes {
            state.entries.insert(key, VersionedValue { value, version });
        }
        debug!(version, writes = count, "commit applied");
        Ok(version)
    }
}

impl std::fmt::Debug for InMemoryLedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedgerStore")
            .field("key_count", &self.len())
            .field("version", &self.version())
            .finish()
    }
}

/// Resumable cursor: re-acquires the read lock per step and continues after
/// the last key it returned, so no lock is held between items.
struct MemoryCursor<'a> {
    store: &'a InMemoryLedgerStore,
    range: KeyRange,
    last: Option<String>,
    done: bool,
}

impl Iterator for MemoryCursor<'_> {
    type Item = StoreResult<(String, VersionedValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let state = match self.store.state.read() {
            Ok(state) => state,
            Err(_) => {
                self.done = true;
                return Some(Err(StoreError::LockPoisoned));
            }
        };
        let next = range_of(&state.entries, &self.range, self.last.as_deref())
            .next()
            .map(|(key, entry)| (key.clone(), entry.clone()));
        match next {
            Some((key, entry)) => {
                self.last = Some(key.clone());
                Some(Ok((key, entry)))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u64,
    entries: BTreeMap<String, SnapshotEntry>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    version: u64,
    value: String,
}
