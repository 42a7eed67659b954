use chrono::{DateTime, Utc};
use panch_types::{DisputeId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a token reward was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardReason {
    /// The winning party of a resolved dispute.
    DisputeWon,
    /// A voter who sided with the eventual winner.
    CorrectVote,
}

impl fmt::Display for RewardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Audit strings stored alongside the ledger rows
        match self {
            RewardReason::DisputeWon => write!(f, "Won dispute"),
            RewardReason::CorrectVote => write!(f, "Correct vote in dispute"),
        }
    }
}

/// One append-only reward ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardRecord {
    pub user: UserId,
    pub amount: u64,
    pub reason: RewardReason,
    /// Audit linkage back to the dispute that produced the reward.
    pub dispute: Option<DisputeId>,
    pub timestamp: DateTime<Utc>,
}
