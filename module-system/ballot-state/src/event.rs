use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// A key-value pair recorded by a module while it handles a call.
///
/// Events live in the [`crate::WorkingSet`] that produced them and are dropped
/// together with its writes when the working set is reverted.
#[derive(
    Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Event {
    key: String,
    value: String,
}

impl Event {
    /// Creates a new event.
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }

    /// Returns the event key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the event value.
    pub fn value(&self) -> &str {
        &self.value
    }
}
