use crate::error::{DisputeError, Result};
use crate::metrics;
use crate::types::{Dispute, Vote, VoteTally};
use panch_types::UserId;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Weighted vote tallying and the auto-resolution trigger.
///
/// Weights were snapshotted when each vote was cast; the ledger only sums
/// them, it never re-reads voter reputation.
#[derive(Debug, Clone)]
pub struct VoteLedger {
    min_votes_for_auto_resolve: usize,
    supermajority: f64,
}

impl VoteLedger {
    pub fn new(min_votes_for_auto_resolve: usize, supermajority: f64) -> Self {
        Self {
            min_votes_for_auto_resolve,
            supermajority,
        }
    }

    /// Sum cast-time weights per candidate.
    ///
    /// Votes for other disputes are skipped; a duplicate voter in the input
    /// is a storage invariant violation and fails the tally.
    pub fn tally(&self, dispute: &Dispute, votes: &[Vote]) -> Result<VoteTally> {
        let timer = metrics::TALLY_TIME.start_timer();

        let mut for_raiser = 0u64;
        let mut for_responder = 0u64;
        let mut ballots = 0usize;
        let mut seen: HashSet<UserId> = HashSet::new();

        for vote in votes {
            if vote.dispute != dispute.id {
                debug!(
                    dispute = %dispute.id,
                    vote_dispute = %vote.dispute,
                    "Skipping vote for another dispute"
                );
                continue;
            }
            if !seen.insert(vote.voter) {
                timer.observe_duration();
                return Err(DisputeError::DuplicateVote(vote.voter));
            }

            if vote.voted_for == dispute.raised_by {
                for_raiser += vote.weight;
            } else if dispute.responded_by.as_ref() == Some(&vote.voted_for) {
                for_responder += vote.weight;
            } else {
                // Stored votes only ever name a candidate; tolerate and log
                warn!(
                    dispute = %dispute.id,
                    voted_for = %vote.voted_for,
                    "Ignoring vote for a non-candidate"
                );
                continue;
            }
            ballots += 1;
        }

        timer.observe_duration();

        Ok(VoteTally {
            for_raiser,
            for_responder,
            ballots,
        })
    }

    /// The candidate whose weighted total strictly exceeds the supermajority
    /// share of all cast weight, once enough ballots are in. `None` while the
    /// vote count is below the floor, when no side clears the threshold, or
    /// on an exact tie.
    pub fn auto_resolve_winner(&self, dispute: &Dispute, tally: &VoteTally) -> Option<UserId> {
        if tally.ballots < self.min_votes_for_auto_resolve {
            return None;
        }
        let total = tally.total();
        if total == 0 {
            return None;
        }

        let threshold = self.supermajority * total as f64;
        if (tally.for_raiser as f64) > threshold {
            return Some(dispute.raised_by);
        }
        if (tally.for_responder as f64) > threshold {
            return dispute.responded_by;
        }
        None
    }
}
