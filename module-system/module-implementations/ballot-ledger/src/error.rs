use thiserror::Error;

use crate::CandidateId;

/// The ways a ballot operation can fail. None of them leaves state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BallotError {
    /// The genesis configuration cannot produce a valid ledger.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// A mutation argument is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Someone other than the owner attempted an owner-only operation.
    #[error("Only the owner can call this function")]
    Unauthorized,
    /// The participant has already cast their vote.
    #[error("You have already voted")]
    AlreadyVoted,
    /// No candidate is registered under the given id.
    #[error("Invalid candidate ID: {0}")]
    InvalidCandidate(CandidateId),
    /// The registry holds no candidate to report.
    #[error("No candidates are registered")]
    NoCandidates,
}
