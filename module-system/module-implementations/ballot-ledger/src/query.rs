use anyhow::Result;
use ballot_modules_api::{Context, WorkingSet};

use crate::{Ballot, BallotError, Candidate, CandidateId};

/// All candidates in ascending id order, as three parallel sequences.
#[derive(Debug, Default, Eq, PartialEq, Clone, serde::Deserialize, serde::Serialize)]
pub struct CandidatesResponse {
    /// Candidate ids, `1..=n`.
    pub ids: Vec<CandidateId>,
    /// Candidate names, aligned with `ids`.
    pub names: Vec<String>,
    /// Vote counts, aligned with `ids`.
    pub vote_counts: Vec<u64>,
}

impl FromIterator<Candidate> for CandidatesResponse {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        let mut response = CandidatesResponse::default();
        for candidate in iter {
            response.ids.push(candidate.id);
            response.names.push(candidate.name);
            response.vote_counts.push(candidate.vote_count);
        }
        response
    }
}

impl<C: Context> Ballot<C> {
    /// Returns every candidate in ascending id order.
    pub fn get_candidates(&self, working_set: &WorkingSet<C::Storage>) -> CandidatesResponse {
        self.candidates.iter(working_set).collect()
    }

    /// Returns the candidate with the most votes.
    ///
    /// Candidates are scanned in ascending id order and the leader is only
    /// replaced on a strictly higher count, so ties go to the lowest id.
    pub fn get_winner(
        &self,
        working_set: &WorkingSet<C::Storage>,
    ) -> Result<Candidate, BallotError> {
        let mut winner: Option<Candidate> = None;

        for candidate in self.candidates.iter(working_set) {
            let leads = winner
                .as_ref()
                .map_or(true, |leader| candidate.vote_count > leader.vote_count);
            if leads {
                winner = Some(candidate);
            }
        }

        winner.ok_or(BallotError::NoCandidates)
    }

    /// Returns whether `participant` has voted. Unknown participants have not.
    pub fn has_voted(
        &self,
        participant: &C::Address,
        working_set: &WorkingSet<C::Storage>,
    ) -> bool {
        self.participants
            .get(participant, working_set)
            .unwrap_or_default()
    }

    /// Returns a single candidate.
    pub fn candidate(
        &self,
        candidate_id: CandidateId,
        working_set: &WorkingSet<C::Storage>,
    ) -> Result<Candidate, BallotError> {
        let index = self.candidate_index(candidate_id, working_set)?;
        self.candidates
            .get(index, working_set)
            .ok_or(BallotError::InvalidCandidate(candidate_id))
    }

    /// Returns the number of registered candidates.
    pub fn candidates_count(&self, working_set: &WorkingSet<C::Storage>) -> CandidateId {
        self.candidates.len(working_set) as CandidateId
    }

    /// Returns the owner set at genesis.
    pub fn owner(&self, working_set: &WorkingSet<C::Storage>) -> Result<C::Address> {
        Ok(self.owner.get_or_err(working_set)?)
    }
}
