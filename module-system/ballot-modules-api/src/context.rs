use std::fmt::{Debug, Display};

use ballot_state::{MemStorage, Storage};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Address;

/// The `Spec` trait fixes the primitive types a particular deployment runs with.
///
/// Modules are generic over a [`Context`], and by extension over its `Spec`,
/// so the same module code runs against any identity scheme or storage backend.
pub trait Spec {
    /// The identity type of callers.
    type Address: BorshSerialize
        + BorshDeserialize
        + Serialize
        + DeserializeOwned
        + schemars::JsonSchema
        + Clone
        + Debug
        + Display
        + PartialEq
        + Eq
        + From<[u8; 32]>
        + Send
        + Sync;

    /// Authoritative state storage.
    type Storage: Storage;
}

/// A context contains the information passed to modules while they handle a
/// call. Currently that is the caller, as authenticated by the identity
/// provider in front of the ledger.
pub trait Context: Spec + Clone + Debug + PartialEq + 'static {
    /// Sender of the call.
    fn sender(&self) -> &Self::Address;

    /// Constructor for the Context.
    fn new(sender: Self::Address) -> Self;
}

/// The [`Context`] used by default: bech32m [`Address`]es over [`MemStorage`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefaultContext {
    /// Sender of the call.
    pub sender: Address,
}

impl Spec for DefaultContext {
    type Address = Address;
    type Storage = MemStorage;
}

impl Context for DefaultContext {
    fn sender(&self) -> &Self::Address {
        &self.sender
    }

    fn new(sender: Self::Address) -> Self {
        Self { sender }
    }
}
