//! Storage and state management interfaces for ballot ledger modules.

#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod codec;
mod containers;
mod event;
mod scratchpad;
/// Trait and type definitions related to the [`Storage`] trait.
pub mod storage;

use std::fmt::Display;
use std::str;

pub use containers::*;
pub use event::Event;
pub use scratchpad::{StateCheckpoint, WorkingSet};
pub use storage::{MemStorage, StateDiff, StateSnapshot, Storage, StorageError};

/// A prefix prepended to each key before insertion and retrieval from the storage.
///
/// All state containers of a module share the same working set, so every
/// container needs its own prefix to avoid key collisions.
#[derive(
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Prefix {
    prefix: Vec<u8>,
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match str::from_utf8(&self.prefix) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "0x{}", hex::encode(&self.prefix)),
        }
    }
}

impl Prefix {
    /// Creates a new prefix from a byte vector.
    pub fn new(prefix: Vec<u8>) -> Self {
        Self { prefix }
    }

    /// Returns the raw bytes of the prefix.
    pub fn as_bytes(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns the length in bytes of the prefix.
    pub fn len(&self) -> usize {
        self.prefix.len()
    }

    /// Returns `true` if the prefix is empty, `false` otherwise.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Returns a new prefix allocated on the fly, by extending the current
    /// prefix with the given bytes.
    pub fn extended(&self, bytes: &[u8]) -> Self {
        let mut prefix = self.clone();
        prefix.extend(bytes.iter().copied());
        prefix
    }
}

impl Extend<u8> for Prefix {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        self.prefix.extend(iter)
    }
}

impl From<&str> for Prefix {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes().to_vec())
    }
}
