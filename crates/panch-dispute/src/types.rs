use chrono::{DateTime, Utc};
use panch_types::{canonical, ContractId, DisputeId, UserId};
use serde::{Deserialize, Serialize};

/// Dispute lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    /// Raised, awaiting the counterparty's response
    Open,
    /// Both sides on record; voting window is open
    Responded,
    /// Terminal; a resolution record exists
    Resolved,
}

impl DisputeStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    pub fn can_transition_to(&self, next: &Self) -> bool {
        use DisputeStatus::*;
        match (self, next) {
            (Open, Responded) => true,
            (Responded, Resolved) => true,
            // An arbiter may close out a dispute that never got a response
            (Open, Resolved) => true,
            (Resolved, _) => false,
            _ => false,
        }
    }
}

/// A formal disagreement raised against an engagement contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub contract: ContractId,
    pub raised_by: UserId,
    pub responded_by: Option<UserId>,
    pub reason: String,
    pub evidence: String,
    pub response: Option<String>,
    pub status: DisputeStatus,
    /// Append-only evidence chain: the raise digest, then
    /// `"{raise_digest}-{response_digest}"` once a response lands.
    pub evidence_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Dispute {
    /// Compute the content-addressed dispute id over the canonical raise
    /// payload.
    pub fn compute_id(
        contract: &ContractId,
        raised_by: &UserId,
        reason: &str,
        evidence: &str,
        created_at: DateTime<Utc>,
    ) -> Result<DisputeId, panch_types::CanonicalJsonError> {
        #[derive(Serialize)]
        struct CanonicalRaise<'a> {
            contract: &'a ContractId,
            raised_by: &'a UserId,
            reason: &'a str,
            evidence: &'a str,
            created_at: i64,
        }

        let hash = canonical::canonical_hash(&CanonicalRaise {
            contract,
            raised_by,
            reason,
            evidence,
            created_at: created_at.timestamp_millis(),
        })?;

        crate::metrics::DISPUTE_ID_COMPUTATIONS.inc();

        Ok(DisputeId::from_bytes(hash))
    }

    /// The two candidates a vote may name: raiser and (if any) responder.
    pub fn parties(&self) -> (UserId, Option<UserId>) {
        (self.raised_by, self.responded_by)
    }

    pub fn is_candidate(&self, user: &UserId) -> bool {
        self.raised_by == *user || self.responded_by.as_ref() == Some(user)
    }
}

/// Who authorized a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolver {
    /// A human arbiter: admin role or arbitration-tier badge required.
    Arbiter(UserId),
    /// The engine itself, acting on a vote-supermajority trigger.
    System,
}

/// One reputation-weighted vote on a responded dispute.
///
/// Immutable once stored; `weight` is the voter's weight at cast time and is
/// never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub dispute: DisputeId,
    pub voter: UserId,
    pub voted_for: UserId,
    pub weight: u64,
    pub cast_at: DateTime<Utc>,
}

/// The single resolution record of a dispute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub dispute: DisputeId,
    pub winner: UserId,
    pub resolver: Resolver,
    pub resolved_at: DateTime<Utc>,
}

/// Weighted totals for the two candidates of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Summed weight of votes for the raising party
    pub for_raiser: u64,
    /// Summed weight of votes for the responding party
    pub for_responder: u64,
    /// Number of ballots cast
    pub ballots: usize,
}

impl VoteTally {
    pub fn total(&self) -> u64 {
        self.for_raiser + self.for_responder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(DisputeStatus::Resolved.is_terminal());
        assert!(!DisputeStatus::Open.is_terminal());
        assert!(!DisputeStatus::Responded.is_terminal());
    }

    #[test]
    fn test_valid_transitions() {
        assert!(DisputeStatus::Open.can_transition_to(&DisputeStatus::Responded));
        assert!(DisputeStatus::Responded.can_transition_to(&DisputeStatus::Resolved));
        assert!(DisputeStatus::Open.can_transition_to(&DisputeStatus::Resolved));
    }

    #[test]
    fn test_no_regression() {
        assert!(!DisputeStatus::Responded.can_transition_to(&DisputeStatus::Open));
        assert!(!DisputeStatus::Resolved.can_transition_to(&DisputeStatus::Open));
        assert!(!DisputeStatus::Resolved.can_transition_to(&DisputeStatus::Responded));
    }

    #[test]
    fn test_compute_id_deterministic() {
        let contract = ContractId::from_bytes([1; 32]);
        let raiser = UserId::from_bytes([2; 32]);
        let at = Utc::now();

        let a = Dispute::compute_id(&contract, &raiser, "non-payment", "invoice", at).unwrap();
        let b = Dispute::compute_id(&contract, &raiser, "non-payment", "invoice", at).unwrap();
        assert_eq!(a, b);

        let c = Dispute::compute_id(&contract, &raiser, "late delivery", "invoice", at).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_candidates() {
        let dispute = Dispute {
            id: DisputeId::from_bytes([0; 32]),
            contract: ContractId::from_bytes([1; 32]),
            raised_by: UserId::from_bytes([2; 32]),
            responded_by: Some(UserId::from_bytes([3; 32])),
            reason: "non-payment".into(),
            evidence: "invoice".into(),
            response: Some("paid in full".into()),
            status: DisputeStatus::Responded,
            evidence_hash: "abc-def".into(),
            created_at: Utc::now(),
        };

        assert!(dispute.is_candidate(&UserId::from_bytes([2; 32])));
        assert!(dispute.is_candidate(&UserId::from_bytes([3; 32])));
        assert!(!dispute.is_candidate(&UserId::from_bytes([9; 32])));
    }
}
