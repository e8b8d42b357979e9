use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::codec::{StateKeyCodec, StateValueCodec};
use crate::Prefix;

/// `Key` type for the [`Storage`].
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    BorshDeserialize,
    BorshSerialize,
)]
pub struct StorageKey {
    key: Arc<Vec<u8>>,
}

impl StorageKey {
    /// Creates a new [`StorageKey`] that combines a prefix and a key.
    pub fn new<K, KC>(prefix: &Prefix, key: &K, codec: &KC) -> Self
    where
        KC: StateKeyCodec<K>,
    {
        let encoded_key = codec.encode_key(key);

        let mut full_key = Vec::<u8>::with_capacity(prefix.len() + encoded_key.len());
        full_key.extend_from_slice(prefix.as_bytes());
        full_key.extend_from_slice(&encoded_key);

        Self {
            key: Arc::new(full_key),
        }
    }

    /// Creates a new [`StorageKey`] that holds nothing but the prefix. Used by
    /// single-value containers.
    pub fn singleton(prefix: &Prefix) -> Self {
        Self {
            key: Arc::new(prefix.as_bytes().to_vec()),
        }
    }

    /// Returns the raw bytes of the key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.key.as_ref()))
    }
}

/// A serialized value suitable for storing. Internally uses an [`Arc<Vec<u8>>`] for cheap cloning.
#[derive(
    Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize, Default,
)]
pub struct StorageValue {
    value: Arc<Vec<u8>>,
}

impl From<Vec<u8>> for StorageValue {
    fn from(value: Vec<u8>) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

impl StorageValue {
    /// Create a new storage value by serializing the input with the given codec.
    pub fn new<V, VC>(value: &V, codec: &VC) -> Self
    where
        VC: StateValueCodec<V>,
    {
        Self::from(codec.encode_value(value))
    }

    /// Get the bytes of this value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// An immutable, versioned view of the whole state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    version: u64,
    entries: BTreeMap<StorageKey, StorageValue>,
}

impl StateSnapshot {
    /// Number of commits applied before this snapshot was taken.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the stored value for `key`, if any.
    pub fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        self.entries.get(key).cloned()
    }

    /// Number of keys present in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The writes accumulated by a [`crate::StateCheckpoint`], ready to be applied
/// to the [`Storage`] it was read from as a single batch.
///
/// `None` marks a deletion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateDiff {
    base_version: u64,
    writes: BTreeMap<StorageKey, Option<StorageValue>>,
}

impl StateDiff {
    pub(crate) fn new(
        base_version: u64,
        writes: BTreeMap<StorageKey, Option<StorageValue>>,
    ) -> Self {
        Self {
            base_version,
            writes,
        }
    }

    /// Number of keys written or deleted.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` if the diff carries no writes.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Errors returned by [`Storage::commit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Another batch was committed after the diff's base snapshot was taken.
    #[error("stale write set: computed against version {base}, storage is at version {current}")]
    Conflict {
        /// Version the diff was computed against.
        base: u64,
        /// Version the storage is currently at.
        current: u64,
    },
}

/// An authoritative state store.
///
/// Readers obtain whole immutable snapshots, writers hand in a [`StateDiff`]
/// computed against some snapshot. A commit is all-or-nothing and is rejected
/// if the storage moved past the diff's base version in the meantime.
pub trait Storage: Clone + Send + Sync {
    /// Returns the most recent committed snapshot.
    fn latest(&self) -> Arc<StateSnapshot>;

    /// Atomically applies `diff` and returns the new version.
    ///
    /// An empty diff is accepted without bumping the version.
    fn commit(&self, diff: StateDiff) -> Result<u64, StorageError>;
}

/// In-memory, copy-on-write [`Storage`]. Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct MemStorage {
    state: Arc<RwLock<Arc<StateSnapshot>>>,
}

impl MemStorage {
    /// Creates an empty storage at version 0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemStorage {
    fn latest(&self) -> Arc<StateSnapshot> {
        self.state
            .read()
            .expect("Storage lock must not be poisoned")
            .clone()
    }

    fn commit(&self, diff: StateDiff) -> Result<u64, StorageError> {
        let mut state = self
            .state
            .write()
            .expect("Storage lock must not be poisoned");

        if state.version != diff.base_version {
            return Err(StorageError::Conflict {
                base: diff.base_version,
                current: state.version,
            });
        }

        if diff.is_empty() {
            return Ok(state.version);
        }

        let mut next = StateSnapshot::clone(&state);
        for (key, value) in diff.writes {
            match value {
                Some(value) => {
                    next.entries.insert(key, value);
                }
                None => {
                    next.entries.remove(&key);
                }
            }
        }
        next.version += 1;

        debug!(version = next.version, keys = next.entries.len(), "Committed state diff");
        let version = next.version;
        *state = Arc::new(next);

        Ok(version)
    }
}
