#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
mod call;
mod error;
mod genesis;
mod ledger;
mod query;
mod types;

#[cfg(test)]
mod tests;

use ballot_modules_api::{
    field_prefix, module_address, module_prefix, CallResponse, Context, Module,
    ModuleCallJsonSchema, ModuleError, ModuleInfo, Prefix, Spec, StateMap, StateValue, StateVec,
    WorkingSet,
};
pub use call::CallMessage;
pub use error::BallotError;
pub use ledger::{BallotLedger, LedgerError, Receipt};
pub use query::CandidatesResponse;
pub use types::{Candidate, CandidateId};

const MODULE_NAME: &str = "Ballot";

/// Initial configuration for the ballot module.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone)]
pub struct BallotConfig<C: Context> {
    /// The only identity allowed to add candidates after genesis.
    pub owner: C::Address,
    /// Seed candidates, registered with ids `1..=candidates.len()` in this order.
    pub candidates: Vec<String>,
}

impl<C: Context> BallotConfig<C> {
    /// The reference deployment: three seed candidates.
    pub fn reference(owner: C::Address) -> Self {
        Self {
            owner,
            candidates: (1..=3).map(|n| format!("Candidate {n}")).collect(),
        }
    }
}

/// The ballot module.
///
/// The struct holds no state itself, only the prefixes its state lives under,
/// so any number of handles can be created and cloned freely.
#[derive(Clone)]
pub struct Ballot<C: Context> {
    /// Address of the module.
    pub address: C::Address,

    /// Identity set at genesis with exclusive rights to add candidates.
    pub(crate) owner: StateValue<C::Address>,

    /// Candidate with id `n` is stored at index `n - 1`.
    pub(crate) candidates: StateVec<Candidate>,

    /// Whether an address already cast its vote. Absent means `false`.
    pub(crate) participants: StateMap<C::Address, bool>,
}

impl<C: Context> Default for Ballot<C> {
    fn default() -> Self {
        let prefix = module_prefix(module_path!(), MODULE_NAME);
        Self {
            address: module_address(module_path!(), MODULE_NAME),
            owner: StateValue::new(field_prefix(&prefix, "owner")),
            candidates: StateVec::new(field_prefix(&prefix, "candidates")),
            participants: StateMap::new(field_prefix(&prefix, "participants")),
        }
    }
}

impl<C: Context> ModuleInfo for Ballot<C> {
    type Context = C;

    fn address(&self) -> &<C as Spec>::Address {
        &self.address
    }

    fn prefix(&self) -> Prefix {
        module_prefix(module_path!(), MODULE_NAME)
    }
}

impl<C: Context> Module for Ballot<C> {
    type Context = C;

    type Config = BallotConfig<C>;

    type CallMessage = CallMessage;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<(), ModuleError> {
        Ok(self.init_module(config, working_set)?)
    }

    fn call(
        &self,
        msg: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse, ModuleError> {
        match msg {
            CallMessage::AddCandidate { name } => {
                self.add_candidate(name, context, working_set)?;
            }
            CallMessage::Vote { candidate_id } => {
                self.vote(candidate_id, context, working_set)?;
            }
        }
        Ok(CallResponse::default())
    }
}

impl<C: Context> ModuleCallJsonSchema for Ballot<C> {
    fn json_schema() -> String {
        let schema = schemars::schema_for!(CallMessage);
        serde_json::to_string_pretty(&schema).expect("JSON schema of CallMessage is serializable")
    }
}
