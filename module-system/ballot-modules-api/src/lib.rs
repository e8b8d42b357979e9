#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod address;
mod config;
mod context;
mod error;
pub mod module;

pub use address::{Address, Bech32ParseError, HRP};
pub use ballot_state::codec::BorshCodec;
pub use ballot_state::{
    Event, MemStorage, Prefix, StateCheckpoint, StateMap, StateMapError, StateValue,
    StateValueError, StateVec, StateVecError, Storage, StorageError, WorkingSet,
};
pub use config::{from_json_path, from_toml_path};
pub use context::{Context, DefaultContext, Spec};
pub use error::ModuleError;
pub use module::{
    field_prefix, module_address, module_prefix, CallResponse, Module, ModuleCallJsonSchema,
    ModuleInfo,
};
