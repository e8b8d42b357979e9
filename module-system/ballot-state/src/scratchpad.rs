use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::codec::{StateKeyCodec, StateValueCodec};
use crate::event::Event;
use crate::storage::{StateDiff, StateSnapshot, StorageError, StorageKey, StorageValue};
use crate::{Prefix, Storage};

type Writes = BTreeMap<StorageKey, Option<StorageValue>>;

/// Writes accumulated on top of one pinned storage snapshot.
struct Delta<S: Storage> {
    storage: S,
    snapshot: Arc<StateSnapshot>,
    writes: Writes,
}

/// A wrapper that adds additional writes on top of an underlying [`Delta`].
///
/// Reverting discards only these writes, so a single failing operation never
/// takes down the writes of the operations checkpointed before it.
struct RevertableDelta<S: Storage> {
    inner: Delta<S>,
    writes: Writes,
}

impl<S: Storage> Debug for Delta<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delta")
            .field("version", &self.snapshot.version())
            .field("writes", &self.writes.len())
            .finish()
    }
}

impl<S: Storage> Debug for RevertableDelta<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevertableDelta")
            .field("inner", &self.inner)
            .field("writes", &self.writes.len())
            .finish()
    }
}

/// The state changes that survived every [`WorkingSet`] built on top of it.
///
/// Obtained from a [`WorkingSet`] through either [`WorkingSet::checkpoint`] or
/// [`WorkingSet::revert`], and applied to storage with
/// [`StateCheckpoint::commit`].
#[derive(Debug)]
pub struct StateCheckpoint<S: Storage> {
    delta: Delta<S>,
}

impl<S: Storage> StateCheckpoint<S> {
    /// Creates a checkpoint over the latest snapshot of `storage`.
    pub fn new(storage: S) -> Self {
        let snapshot = storage.latest();
        Self {
            delta: Delta {
                storage,
                snapshot,
                writes: Default::default(),
            },
        }
    }

    /// Opens a new revertable [`WorkingSet`] on top of this checkpoint.
    pub fn to_revertable(self) -> WorkingSet<S> {
        WorkingSet {
            delta: RevertableDelta {
                inner: self.delta,
                writes: Default::default(),
            },
            events: Default::default(),
        }
    }

    /// Turns the checkpoint into a [`StateDiff`] against its base snapshot.
    pub fn freeze(self) -> StateDiff {
        StateDiff::new(self.delta.snapshot.version(), self.delta.writes)
    }

    /// Applies all checkpointed writes to the backing storage as one batch.
    pub fn commit(self) -> Result<u64, StorageError> {
        let storage = self.delta.storage.clone();
        storage.commit(self.freeze())
    }
}

/// This structure contains the read-write set and the events collected during
/// the execution of one operation.
///
/// There are two ways to convert it into a [`StateCheckpoint`]:
/// 1. [`WorkingSet::checkpoint`] keeps all the changes.
/// 2. [`WorkingSet::revert`] drops the changes made since the working set was opened.
///
/// Events are dropped in both cases, take them with [`WorkingSet::take_events`] first.
#[derive(Debug)]
pub struct WorkingSet<S: Storage> {
    delta: RevertableDelta<S>,
    events: Vec<Event>,
}

impl<S: Storage> WorkingSet<S> {
    /// Opens a working set over the latest snapshot of `storage`.
    pub fn new(storage: S) -> Self {
        StateCheckpoint::new(storage).to_revertable()
    }

    /// Keeps the changes of this working set.
    pub fn checkpoint(self) -> StateCheckpoint<S> {
        let RevertableDelta { mut inner, writes } = self.delta;
        inner.writes.extend(writes);
        StateCheckpoint { delta: inner }
    }

    /// Discards the changes of this working set.
    pub fn revert(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.inner,
        }
    }

    /// Version of the snapshot every read of this working set is served from.
    pub fn snapshot_version(&self) -> u64 {
        self.delta.inner.snapshot.version()
    }

    /// Records an event.
    pub fn add_event(&mut self, key: &str, value: &str) {
        self.events.push(Event::new(key, value));
    }

    /// Takes all the events recorded so far.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Returns the events recorded so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        if let Some(value) = self.delta.writes.get(key) {
            return value.clone();
        }
        if let Some(value) = self.delta.inner.writes.get(key) {
            return value.clone();
        }
        self.delta.inner.snapshot.get(key)
    }

    fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.delta.writes.insert(key, Some(value));
    }

    fn delete(&mut self, key: StorageKey) {
        self.delta.writes.insert(key, None);
    }
}

impl<S: Storage> WorkingSet<S> {
    pub(crate) fn set_value<K, V, C>(&mut self, prefix: &Prefix, key: &K, value: &V, codec: &C)
    where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        let storage_value = StorageValue::new(value, codec);
        self.set(storage_key, storage_value);
    }

    pub(crate) fn get_value<K, V, C>(&self, prefix: &Prefix, key: &K, codec: &C) -> Option<V>
    where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        self.get_decoded(&storage_key, codec)
    }

    pub(crate) fn remove_value<K, V, C>(
        &mut self,
        prefix: &Prefix,
        key: &K,
        codec: &C,
    ) -> Option<V>
    where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        let value = self.get_decoded(&storage_key, codec)?;
        self.delete(storage_key);
        Some(value)
    }

    pub(crate) fn delete_value<K, C>(&mut self, prefix: &Prefix, key: &K, codec: &C)
    where
        C: StateKeyCodec<K>,
    {
        self.delete(StorageKey::new(prefix, key, codec));
    }

    pub(crate) fn set_singleton<V, C>(&mut self, prefix: &Prefix, value: &V, codec: &C)
    where
        C: StateValueCodec<V>,
    {
        let storage_value = StorageValue::new(value, codec);
        self.set(StorageKey::singleton(prefix), storage_value);
    }

    pub(crate) fn get_singleton<V, C>(&self, prefix: &Prefix, codec: &C) -> Option<V>
    where
        C: StateValueCodec<V>,
    {
        self.get_decoded(&StorageKey::singleton(prefix), codec)
    }

    pub(crate) fn remove_singleton<V, C>(&mut self, prefix: &Prefix, codec: &C) -> Option<V>
    where
        C: StateValueCodec<V>,
    {
        let storage_key = StorageKey::singleton(prefix);
        let value = self.get_decoded(&storage_key, codec)?;
        self.delete(storage_key);
        Some(value)
    }

    pub(crate) fn delete_singleton(&mut self, prefix: &Prefix) {
        self.delete(StorageKey::singleton(prefix));
    }

    fn get_decoded<V, C>(&self, storage_key: &StorageKey, codec: &C) -> Option<V>
    where
        C: StateValueCodec<V>,
    {
        let storage_value = self.get(storage_key)?;
        Some(codec.decode_value(storage_value.value()))
    }
}
