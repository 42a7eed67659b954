use crate::id::{ContractId, UserId};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an engagement contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Pending,
    Active,
    Disputed,
    Completed,
    Cancelled,
}

impl ContractStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: &Self) -> bool {
        use ContractStatus::*;
        match (self, next) {
            (Pending, Active) => true,
            (Pending, Cancelled) => true,
            (Active, Completed) => true,
            (Active, Cancelled) => true,
            // A dispute can be raised against active or already-delivered work
            (Active, Disputed) => true,
            (Completed, Disputed) => true,
            // Dispute resolution closes the contract out
            (Disputed, Completed) => true,
            _ => false,
        }
    }

    /// Statuses from which a dispute may be raised.
    pub fn accepts_dispute(&self) -> bool {
        matches!(self, Self::Active | Self::Completed)
    }
}

/// Contract subset the arbitration engine operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engagement {
    pub id: ContractId,
    pub student: UserId,
    pub employer: UserId,
    pub status: ContractStatus,
}

impl Engagement {
    pub fn new(id: ContractId, student: UserId, employer: UserId, status: ContractStatus) -> Self {
        Self {
            id,
            student,
            employer,
            status,
        }
    }

    pub fn is_party(&self, user: &UserId) -> bool {
        self.student == *user || self.employer == *user
    }

    /// The counterparty to `user`, if `user` is a party at all.
    pub fn other_party(&self, user: &UserId) -> Option<UserId> {
        if self.student == *user {
            Some(self.employer)
        } else if self.employer == *user {
            Some(self.student)
        } else {
            None
        }
    }
}
