use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Sequential candidate identifier, starting at 1.
pub type CandidateId = u64;

/// A registered candidate and its running tally.
#[derive(
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    Debug,
    PartialEq,
    Eq,
    Clone,
)]
pub struct Candidate {
    /// Position in registration order, starting at 1.
    pub id: CandidateId,
    /// Display name, never empty.
    pub name: String,
    /// Number of votes received.
    pub vote_count: u64,
}

impl Candidate {
    pub(crate) fn new(id: CandidateId, name: String) -> Self {
        Self {
            id,
            name,
            vote_count: 0,
        }
    }
}
