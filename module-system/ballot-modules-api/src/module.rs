//! Module definitions.

use std::fmt::Debug;

use ballot_state::{Prefix, WorkingSet};
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::{Context, ModuleError, Spec};

/// Response type for the [`Module::call`] method.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CallResponse {}

/// The core trait implemented by all modules. This trait defines how a module
/// is initialized at genesis, and how it handles calls.
pub trait Module {
    /// Execution context.
    type Context: Context;

    /// Configuration for the genesis method.
    type Config;

    /// Module defined argument to the call method.
    type CallMessage: Debug + BorshSerialize + BorshDeserialize;

    /// Genesis is called once, when the ledger is constructed, and sets the
    /// initial state of the module.
    fn genesis(
        &self,
        _config: &Self::Config,
        _working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Call allows interaction with the module and invokes state changes.
    /// It takes a module defined type and a context as parameters.
    fn call(
        &self,
        message: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<CallResponse, ModuleError>;
}

/// A [`Module`] that has a well-defined and known [JSON
/// Schema](https://json-schema.org/) for its [`Module::CallMessage`].
pub trait ModuleCallJsonSchema: Module {
    /// Returns the JSON schema for [`Module::CallMessage`].
    fn json_schema() -> String;
}

/// Every module has to implement this trait.
pub trait ModuleInfo {
    /// Execution context.
    type Context: Context;

    /// Returns address of the module.
    fn address(&self) -> &<Self::Context as Spec>::Address;

    /// Returns the prefix all of the module's state is stored under.
    fn prefix(&self) -> Prefix;
}

/// Builds the prefix all of a module's state lives under: `<module path>/<module name>/`.
pub fn module_prefix(module_path: &str, module_name: &str) -> Prefix {
    Prefix::new(format!("{module_path}/{module_name}/").into_bytes())
}

/// Builds the prefix of one state field, nested under its module's prefix.
pub fn field_prefix(module_prefix: &Prefix, field: &str) -> Prefix {
    module_prefix.extended(format!("{field}/").as_bytes())
}

/// Derives the address of a module from its path and name.
pub fn module_address<A: From<[u8; 32]>>(module_path: &str, module_name: &str) -> A {
    let digest: [u8; 32] = Sha256::digest(format!("{module_path}/{module_name}")).into();
    A::from(digest)
}
