use anyhow::{bail, Result};
use ballot_modules_api::{Context, WorkingSet};

use crate::{Ballot, BallotConfig, BallotError, Candidate, CandidateId};

impl<C: Context> Ballot<C> {
    /// Sets the owner and registers the seed candidates, ids starting at 1.
    pub(crate) fn init_module(
        &self,
        config: &BallotConfig<C>,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<()> {
        if self.owner.get(working_set).is_some() {
            bail!(BallotError::InvalidConfig(
                "the ledger is already constructed".to_owned()
            ));
        }

        if config.candidates.is_empty() {
            bail!(BallotError::InvalidConfig(
                "at least one seed candidate is required".to_owned()
            ));
        }

        if let Some(position) = config.candidates.iter().position(|name| name.is_empty()) {
            bail!(BallotError::InvalidConfig(format!(
                "seed candidate #{} has an empty name",
                position + 1
            )));
        }

        self.owner.set(&config.owner, working_set);
        for name in config.candidates.iter() {
            self.register_candidate(name.clone(), working_set);
        }

        working_set.add_event(
            "Ballot: genesis",
            &format!(
                "owner: {}, candidates: {}",
                config.owner,
                config.candidates.len()
            ),
        );

        Ok(())
    }

    /// Appends a candidate with the next sequential id and returns that id.
    pub(crate) fn register_candidate(
        &self,
        name: String,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> CandidateId {
        let id = self.candidates.len(working_set) as CandidateId + 1;
        self.candidates.push(&Candidate::new(id, name), working_set);
        id
    }
}
