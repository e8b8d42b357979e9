use anyhow::{anyhow, bail, ensure, Result};
use ballot_modules_api::{Context, WorkingSet};

use crate::{Ballot, BallotError, CandidateId};

/// Call actions supported by the module.
#[derive(
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
    Debug,
    PartialEq,
    Eq,
    Clone,
)]
#[serde(rename_all = "snake_case")]
pub enum CallMessage {
    /// Registers a new candidate. Owner only.
    AddCandidate {
        /// Display name of the candidate.
        name: String,
    },
    /// Casts the sender's single vote.
    Vote {
        /// Id of the chosen candidate.
        candidate_id: CandidateId,
    },
}

impl<C: Context> Ballot<C> {
    /// Adds a candidate. Must be called by the owner.
    pub(crate) fn add_candidate(
        &self,
        name: String,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CandidateId> {
        self.exit_if_not_owner(context, working_set)?;
        ensure!(
            !name.is_empty(),
            BallotError::InvalidInput("candidate name must not be empty".to_owned())
        );

        let id = self.register_candidate(name, working_set);
        working_set.add_event(
            "Ballot: add_candidate",
            &format!("Candidate was added: {id}"),
        );

        Ok(id)
    }

    /// Votes for a candidate. Every sender votes at most once.
    pub(crate) fn vote(
        &self,
        candidate_id: CandidateId,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<()> {
        let voter = context.sender();

        // A repeat voter is reported as such whatever id they pass.
        if self.has_voted(voter, working_set) {
            bail!(BallotError::AlreadyVoted);
        }

        let index = self.candidate_index(candidate_id, working_set)?;
        let mut candidate = self.candidates.get_or_err(index, working_set)?;
        candidate.vote_count = candidate
            .vote_count
            .checked_add(1)
            .ok_or(anyhow!("Vote count overflow"))?;

        self.participants.set(voter, &true, working_set);
        self.candidates.set(index, &candidate, working_set)?;

        working_set.add_event(
            "Ballot: vote",
            &format!("Vote from: {voter} accepted for candidate {candidate_id}"),
        );

        Ok(())
    }

    fn exit_if_not_owner(&self, context: &C, working_set: &WorkingSet<C::Storage>) -> Result<()> {
        let owner = self.owner.get_or_err(working_set)?;

        ensure!(&owner == context.sender(), BallotError::Unauthorized);
        Ok(())
    }

    /// Maps a candidate id onto its storage index.
    pub(crate) fn candidate_index(
        &self,
        candidate_id: CandidateId,
        working_set: &WorkingSet<C::Storage>,
    ) -> Result<usize, BallotError> {
        let count = self.candidates_count(working_set);
        if candidate_id == 0 || candidate_id > count {
            return Err(BallotError::InvalidCandidate(candidate_id));
        }
        usize::try_from(candidate_id - 1).map_err(|_| BallotError::InvalidCandidate(candidate_id))
    }
}
