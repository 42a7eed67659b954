use panch_types::{ContractId, ContractStatus, DisputeId, UserId};
use thiserror::Error;

/// Dispute operation result type
pub type Result<T> = std::result::Result<T, DisputeError>;

/// Dispute arbitration errors
///
/// All variants except `Storage` are expected, recoverable, caller-facing
/// conditions.
#[derive(Debug, Error)]
pub enum DisputeError {
    #[error("Contract not found: {0}")]
    ContractNotFound(ContractId),

    #[error("Dispute not found: {0}")]
    DisputeNotFound(DisputeId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Contract in state {status:?} does not accept this action")]
    InvalidContractState { status: ContractStatus },

    #[error("Dispute in wrong status: expected {expected}, found {found}")]
    InvalidStatus { expected: String, found: String },

    #[error("Contract {0} already has an unresolved dispute")]
    DuplicateDispute(ContractId),

    #[error("Duplicate vote from voter: {0}")]
    DuplicateVote(UserId),

    #[error("Dispute already has a response")]
    DuplicateResponse,

    #[error("Dispute already resolved: {0}")]
    AlreadyResolved(DisputeId),

    #[error("Winner {0} is not a party to the dispute")]
    InvalidWinner(UserId),

    #[error("Voter {0} is not eligible to vote on disputes")]
    Ineligible(UserId),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] panch_types::CanonicalJsonError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
