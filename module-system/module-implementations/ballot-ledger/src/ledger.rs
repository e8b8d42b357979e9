use std::sync::{Mutex, PoisonError};

use ballot_modules_api::{
    CallResponse, Context, Event, Module, ModuleError, StorageError, WorkingSet,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    Ballot, BallotConfig, BallotError, CallMessage, Candidate, CandidateId, CandidatesResponse,
};

/// Errors returned by [`BallotLedger`].
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The operation was rejected by the ballot rules.
    #[error(transparent)]
    Ballot(#[from] BallotError),
    /// The operation was valid but its writes could not be committed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Any other module failure, such as corrupted state.
    #[error(transparent)]
    Module(anyhow::Error),
}

impl LedgerError {
    /// Returns the ballot rule that rejected the operation, if any.
    pub fn ballot_error(&self) -> Option<&BallotError> {
        match self {
            LedgerError::Ballot(err) => Some(err),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for LedgerError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<BallotError>() {
            Ok(err) => LedgerError::Ballot(err),
            Err(err) => LedgerError::Module(err),
        }
    }
}

impl From<ModuleError> for LedgerError {
    fn from(err: ModuleError) -> Self {
        err.into_inner().into()
    }
}

/// The outcome of a committed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt<T> {
    /// What the operation returned.
    pub value: T,
    /// Events recorded by the module while handling the operation.
    pub events: Vec<Event>,
    /// Storage version the operation was committed as.
    pub version: u64,
}

/// Hosts a [`Ballot`] module on top of a storage.
///
/// Mutations are applied one at a time. Each runs in its own [`WorkingSet`]
/// and is committed as one batch if it succeeds or reverted if it fails.
/// Queries open a working set on the latest snapshot and never block writers.
pub struct BallotLedger<C: Context> {
    storage: C::Storage,
    module: Ballot<C>,
    writer: Mutex<()>,
}

impl<C: Context> BallotLedger<C> {
    /// Constructs a new ledger in `storage` from a genesis configuration.
    ///
    /// Fails with [`BallotError::InvalidConfig`] if the configuration seeds no
    /// candidate, seeds an empty name, or `storage` already holds a ledger.
    pub fn construct(storage: C::Storage, config: &BallotConfig<C>) -> Result<Self, LedgerError> {
        let ledger = Self::with_storage(storage);
        let receipt = ledger.execute("genesis", |module, working_set| {
            module
                .genesis(config, working_set)
                .map_err(ModuleError::into_inner)
        })?;

        info!(
            owner = %config.owner,
            candidates = config.candidates.len(),
            version = receipt.version,
            "Ballot ledger constructed"
        );
        Ok(ledger)
    }

    /// Attaches to a ledger previously constructed in `storage`.
    pub fn open(storage: C::Storage) -> Result<Self, LedgerError> {
        let ledger = Self::with_storage(storage);
        if ledger.module.owner.get(&ledger.snapshot()).is_none() {
            return Err(BallotError::InvalidConfig(
                "the ledger has not been constructed".to_owned(),
            )
            .into());
        }
        Ok(ledger)
    }

    fn with_storage(storage: C::Storage) -> Self {
        Self {
            storage,
            module: Ballot::default(),
            writer: Mutex::new(()),
        }
    }

    /// Returns the module handle, for queries against a [`BallotLedger::snapshot`].
    pub fn module(&self) -> &Ballot<C> {
        &self.module
    }

    /// Opens a read-only view of the latest committed state.
    ///
    /// Every query against the same snapshot sees the same state, however
    /// many mutations are committed in the meantime.
    pub fn snapshot(&self) -> WorkingSet<C::Storage> {
        WorkingSet::new(self.storage.clone())
    }

    /// Registers a new candidate on behalf of `caller` and returns its id.
    pub fn add_candidate(
        &self,
        name: &str,
        caller: &C::Address,
    ) -> Result<Receipt<CandidateId>, LedgerError> {
        let context = C::new(caller.clone());
        self.execute("add_candidate", |module, working_set| {
            module.add_candidate(name.to_owned(), &context, working_set)
        })
    }

    /// Casts `caller`'s vote for `candidate_id`.
    pub fn vote(
        &self,
        candidate_id: CandidateId,
        caller: &C::Address,
    ) -> Result<Receipt<()>, LedgerError> {
        let context = C::new(caller.clone());
        self.execute("vote", |module, working_set| {
            module.vote(candidate_id, &context, working_set)
        })
    }

    /// Dispatches an encoded [`CallMessage`] on behalf of `caller`.
    pub fn apply(
        &self,
        message: CallMessage,
        caller: &C::Address,
    ) -> Result<Receipt<CallResponse>, LedgerError> {
        let context = C::new(caller.clone());
        self.execute("call", |module, working_set| {
            module
                .call(message, &context, working_set)
                .map_err(ModuleError::into_inner)
        })
    }

    /// See [`Ballot::get_candidates`].
    pub fn get_candidates(&self) -> CandidatesResponse {
        self.module.get_candidates(&self.snapshot())
    }

    /// See [`Ballot::get_winner`].
    pub fn get_winner(&self) -> Result<Candidate, LedgerError> {
        Ok(self.module.get_winner(&self.snapshot())?)
    }

    /// See [`Ballot::has_voted`].
    pub fn has_voted(&self, participant: &C::Address) -> bool {
        self.module.has_voted(participant, &self.snapshot())
    }

    /// See [`Ballot::candidate`].
    pub fn candidate(&self, candidate_id: CandidateId) -> Result<Candidate, LedgerError> {
        Ok(self.module.candidate(candidate_id, &self.snapshot())?)
    }

    /// See [`Ballot::candidates_count`].
    pub fn candidates_count(&self) -> CandidateId {
        self.module.candidates_count(&self.snapshot())
    }

    /// See [`Ballot::owner`].
    pub fn owner(&self) -> Result<C::Address, LedgerError> {
        Ok(self.module.owner(&self.snapshot())?)
    }

    fn execute<T, F>(&self, operation: &'static str, f: F) -> Result<Receipt<T>, LedgerError>
    where
        F: FnOnce(&Ballot<C>, &mut WorkingSet<C::Storage>) -> anyhow::Result<T>,
    {
        // The lock guards no data, so a panic in an earlier call leaves nothing to repair.
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut working_set = WorkingSet::new(self.storage.clone());
        let base_version = working_set.snapshot_version();

        match f(&self.module, &mut working_set) {
            Ok(value) => {
                let events = working_set.take_events();
                let version = working_set.checkpoint().commit().map_err(|err| {
                    warn!(operation, %err, "Failed to commit operation");
                    err
                })?;
                debug!(operation, base_version, version, "Operation committed");
                Ok(Receipt {
                    value,
                    events,
                    version,
                })
            }
            Err(err) => {
                working_set.revert();
                debug!(operation, base_version, %err, "Operation reverted");
                Err(err.into())
            }
        }
    }
}
