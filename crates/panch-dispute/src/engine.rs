use crate::error::{DisputeError, Result};
use crate::ledger::VoteLedger;
use crate::metrics;
use crate::storage::{ContractStore, DisputeStore, UserDirectory};
use crate::types::{Dispute, DisputeStatus, Resolution, Resolver, Vote};
use chrono::Utc;
use panch_economics::{RewardGrant, RewardLedger, RewardReason};
use panch_reputation::{ReputationEvaluator, VotingPower};
use panch_types::{canonical, ContractId, ContractStatus, DisputeId, Role, UserId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Arbitration engine parameters
#[derive(Debug, Clone)]
pub struct ArbitrationConfig {
    /// Minimum ballots before a supermajority can auto-resolve
    pub min_votes_for_auto_resolve: usize,
    /// Weighted share a side must strictly exceed to auto-resolve
    pub supermajority: f64,
    /// Tokens credited to the winning party
    pub winner_reward: u64,
    /// Tokens credited to each voter who backed the winner
    pub voter_reward: u64,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            min_votes_for_auto_resolve: 5,
            supermajority: 0.6,
            winner_reward: 100,
            voter_reward: 10,
        }
    }
}

/// Orchestrates the dispute lifecycle: raise, respond, vote, resolve,
/// reward.
///
/// Atomicity lives in the stores; the engine sequences guards and delegates
/// every check-then-write to a storage critical section.
pub struct ArbitrationEngine {
    config: ArbitrationConfig,
    vote_ledger: VoteLedger,
    evaluator: ReputationEvaluator,
    disputes: Arc<dyn DisputeStore>,
    contracts: Arc<dyn ContractStore>,
    users: Arc<dyn UserDirectory>,
    rewards: Arc<RewardLedger>,
}

impl ArbitrationEngine {
    pub fn new(
        disputes: Arc<dyn DisputeStore>,
        contracts: Arc<dyn ContractStore>,
        users: Arc<dyn UserDirectory>,
        rewards: Arc<RewardLedger>,
    ) -> Self {
        Self::with_config(
            ArbitrationConfig::default(),
            disputes,
            contracts,
            users,
            rewards,
        )
    }

    pub fn with_config(
        config: ArbitrationConfig,
        disputes: Arc<dyn DisputeStore>,
        contracts: Arc<dyn ContractStore>,
        users: Arc<dyn UserDirectory>,
        rewards: Arc<RewardLedger>,
    ) -> Self {
        let vote_ledger = VoteLedger::new(config.min_votes_for_auto_resolve, config.supermajority);
        Self {
            config,
            vote_ledger,
            evaluator: ReputationEvaluator::default(),
            disputes,
            contracts,
            users,
            rewards,
        }
    }

    pub fn with_evaluator(mut self, evaluator: ReputationEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Raise a dispute against a contract.
    ///
    /// The raiser must be a party; the contract must be `Active` or
    /// `Completed`; at most one unresolved dispute may exist per contract.
    /// On success the contract moves to `Disputed`.
    pub async fn raise_dispute(
        &self,
        contract_id: ContractId,
        raised_by: UserId,
        reason: String,
        evidence: String,
    ) -> Result<Dispute> {
        let contract = self
            .contracts
            .get(&contract_id)
            .await?
            .ok_or(DisputeError::ContractNotFound(contract_id))?;

        if !contract.is_party(&raised_by) {
            return Err(DisputeError::Forbidden(
                "only a contract party may raise a dispute".to_string(),
            ));
        }
        if !contract.status.accepts_dispute() {
            return Err(DisputeError::InvalidContractState {
                status: contract.status,
            });
        }

        let created_at = Utc::now();
        let id = Dispute::compute_id(&contract_id, &raised_by, &reason, &evidence, created_at)?;

        let dispute = Dispute {
            id,
            contract: contract_id,
            raised_by,
            responded_by: None,
            reason,
            evidence,
            response: None,
            status: DisputeStatus::Open,
            // The raise digest doubles as the content-addressed dispute id
            evidence_hash: id.to_hex(),
            created_at,
        };

        self.disputes.insert_dispute(dispute.clone()).await?;
        self.contracts
            .set_status(&contract_id, ContractStatus::Disputed)
            .await?;

        metrics::DISPUTES_RAISED.inc();
        info!(
            dispute = %dispute.id,
            contract = %contract_id,
            raised_by = %raised_by,
            "⚖️ Dispute raised"
        );

        Ok(dispute)
    }

    /// Record the counterparty's response and open the voting window.
    pub async fn respond_to_dispute(
        &self,
        dispute_id: DisputeId,
        responder: UserId,
        response: String,
        evidence: String,
    ) -> Result<Dispute> {
        let dispute = self.disputes.get_dispute(&dispute_id).await?;
        let contract = self
            .contracts
            .get(&dispute.contract)
            .await?
            .ok_or(DisputeError::ContractNotFound(dispute.contract))?;

        if responder == dispute.raised_by {
            return Err(DisputeError::Forbidden(
                "the raising party cannot respond to its own dispute".to_string(),
            ));
        }
        if !contract.is_party(&responder) {
            return Err(DisputeError::Forbidden(
                "only the contract counterparty may respond".to_string(),
            ));
        }

        #[derive(Serialize)]
        struct CanonicalResponse<'a> {
            dispute: &'a DisputeId,
            responder: &'a UserId,
            response: &'a str,
            evidence: &'a str,
        }
        let response_digest = canonical::document_digest(&CanonicalResponse {
            dispute: &dispute_id,
            responder: &responder,
            response: &response,
            evidence: &evidence,
        })?;

        let updated = self
            .disputes
            .apply_response(&dispute_id, responder, response, response_digest)
            .await?;

        metrics::DISPUTE_RESPONSES.inc();
        info!(
            dispute = %dispute_id,
            responder = %responder,
            "📨 Dispute response recorded"
        );

        Ok(updated)
    }

    /// Cast a reputation-weighted vote on a responded dispute.
    ///
    /// The voter's weight is computed from their current snapshot and frozen
    /// into the vote. If the post-insert vote set clears the auto-resolution
    /// trigger, the dispute is resolved here with `Resolver::System`.
    pub async fn cast_vote(
        &self,
        dispute_id: DisputeId,
        voter: UserId,
        voted_for: UserId,
    ) -> Result<Vote> {
        let dispute = self.disputes.get_dispute(&dispute_id).await?;

        if dispute.status != DisputeStatus::Responded {
            metrics::VOTE_VALIDATION_FAILURES
                .with_label_values(&["invalid_status"])
                .inc();
            return Err(DisputeError::InvalidStatus {
                expected: "Responded".to_string(),
                found: format!("{:?}", dispute.status),
            });
        }

        // Unknown voters are ineligible, not an internal error
        let snapshot = match self.users.get(&voter).await? {
            Some(snapshot) if self.evaluator.can_vote(&snapshot) => snapshot,
            _ => {
                metrics::VOTE_VALIDATION_FAILURES
                    .with_label_values(&["ineligible"])
                    .inc();
                return Err(DisputeError::Ineligible(voter));
            }
        };

        if !dispute.is_candidate(&voted_for) {
            metrics::VOTE_VALIDATION_FAILURES
                .with_label_values(&["invalid_target"])
                .inc();
            return Err(DisputeError::InvalidWinner(voted_for));
        }
        if dispute.is_candidate(&voter) {
            metrics::VOTE_VALIDATION_FAILURES
                .with_label_values(&["party_vote"])
                .inc();
            return Err(DisputeError::Forbidden(
                "dispute parties may not vote on their own dispute".to_string(),
            ));
        }

        let vote = Vote {
            dispute: dispute_id,
            voter,
            voted_for,
            weight: self.evaluator.vote_weight(&snapshot),
            cast_at: Utc::now(),
        };

        // Uniqueness and the voting-window re-check happen inside the store;
        // the returned set includes this vote and everything concurrent with it
        let all_votes = match self.disputes.insert_vote(vote.clone()).await {
            Ok(votes) => votes,
            Err(e) => {
                if matches!(e, DisputeError::DuplicateVote(_)) {
                    metrics::VOTE_VALIDATION_FAILURES
                        .with_label_values(&["duplicate"])
                        .inc();
                }
                return Err(e);
            }
        };

        metrics::VOTES_CAST.inc();
        info!(
            dispute = %dispute_id,
            voter = %voter,
            weight = vote.weight,
            ballots = all_votes.len(),
            "🗳️ Vote cast"
        );

        let tally = self.vote_ledger.tally(&dispute, &all_votes)?;
        if let Some(winner) = self.vote_ledger.auto_resolve_winner(&dispute, &tally) {
            match self
                .resolve_dispute(dispute_id, Resolver::System, winner)
                .await
            {
                Ok(_) => {}
                // Another voter's auto-resolution beat us to the finalize CAS
                Err(DisputeError::AlreadyResolved(_)) => {
                    debug!(dispute = %dispute_id, "Concurrent resolution already finalized");
                }
                // The vote is committed either way; a later resolve attempt
                // resumes whatever side effects did not land
                Err(e) => {
                    warn!(
                        dispute = %dispute_id,
                        error = %e,
                        "Auto-resolution deferred"
                    );
                }
            }
        }

        Ok(vote)
    }

    /// Resolve a dispute in favor of `winner` and distribute rewards.
    ///
    /// `Resolver::Arbiter` requires the admin role or an arbitration-tier
    /// badge; `Resolver::System` is the engine's own supermajority trigger.
    /// The storage finalize is a compare-and-swap, so a dispute resolves
    /// exactly once and rewards are granted exactly once.
    pub async fn resolve_dispute(
        &self,
        dispute_id: DisputeId,
        resolver: Resolver,
        winner: UserId,
    ) -> Result<Resolution> {
        let dispute = self.disputes.get_dispute(&dispute_id).await?;

        if dispute.status.is_terminal() {
            // An earlier resolution may have committed before its side
            // effects landed; finish them before reporting the duplicate
            self.complete_resolution(&dispute).await?;
            return Err(DisputeError::AlreadyResolved(dispute_id));
        }
        if !dispute.is_candidate(&winner) {
            return Err(DisputeError::InvalidWinner(winner));
        }
        self.authorize_resolver(&resolver).await?;

        let resolution = Resolution {
            dispute: dispute_id,
            winner,
            resolver,
            resolved_at: Utc::now(),
        };

        // The CAS: first caller wins, every other one gets AlreadyResolved
        let resolved = match self.disputes.finalize(resolution.clone()).await {
            Ok(resolved) => resolved,
            Err(DisputeError::AlreadyResolved(_)) => {
                self.complete_resolution(&dispute).await?;
                return Err(DisputeError::AlreadyResolved(dispute_id));
            }
            Err(e) => return Err(e),
        };

        let trigger = match resolver {
            Resolver::Arbiter(_) => "manual",
            Resolver::System => "auto",
        };
        metrics::RESOLUTIONS.with_label_values(&[trigger]).inc();

        self.complete_resolution(&resolved).await?;

        info!(
            dispute = %dispute_id,
            winner = %winner,
            trigger,
            "🏛️ Dispute resolved"
        );

        Ok(resolution)
    }

    /// Post-finalize side effects, safe to re-run after a mid-flight
    /// failure: the contract flip is an idempotent overwrite and reward
    /// distribution skips rows already keyed to this dispute. Any resolve
    /// attempt against a finalized dispute resumes a stranded distribution
    /// before reporting `AlreadyResolved`.
    async fn complete_resolution(&self, dispute: &Dispute) -> Result<()> {
        let resolution = self
            .disputes
            .get_resolution(&dispute.id)
            .await?
            .ok_or_else(|| {
                DisputeError::Storage(anyhow::anyhow!(
                    "resolution record missing for finalized dispute {}",
                    dispute.id
                ))
            })?;

        self.contracts
            .set_status(&dispute.contract, ContractStatus::Completed)
            .await?;

        self.distribute_rewards(dispute, &resolution.winner).await
    }

    async fn authorize_resolver(&self, resolver: &Resolver) -> Result<()> {
        match resolver {
            Resolver::System => Ok(()),
            Resolver::Arbiter(arbiter) => {
                let snapshot = self
                    .users
                    .get(arbiter)
                    .await?
                    .ok_or(DisputeError::UserNotFound(*arbiter))?;
                if snapshot.role == Role::Admin || snapshot.holds_arbitration_badge() {
                    Ok(())
                } else {
                    warn!(arbiter = %arbiter, "❌ Unauthorized resolution attempt");
                    Err(DisputeError::Forbidden(
                        "resolving a dispute requires the admin role or an arbitration-tier badge"
                            .to_string(),
                    ))
                }
            }
        }
    }

    /// Winner bounty plus a bounty for every voter who backed the winner,
    /// credited as one ledger batch.
    ///
    /// Idempotent under the dispute id: grants whose row already exists are
    /// dropped, so resuming after a partial failure never double-credits.
    async fn distribute_rewards(&self, dispute: &Dispute, winner: &UserId) -> Result<()> {
        let votes = self.disputes.votes_for(&dispute.id).await?;

        let mut grants = vec![RewardGrant {
            user: *winner,
            amount: self.config.winner_reward,
            reason: RewardReason::DisputeWon,
            dispute: Some(dispute.id),
        }];
        for vote in votes.iter().filter(|v| v.voted_for == *winner) {
            grants.push(RewardGrant {
                user: vote.voter,
                amount: self.config.voter_reward,
                reason: RewardReason::CorrectVote,
                dispute: Some(dispute.id),
            });
        }

        let existing = self.rewards.rewards_for_dispute(dispute.id).await?;
        grants.retain(|g| {
            !existing
                .iter()
                .any(|r| r.user == g.user && r.reason == g.reason)
        });
        if grants.is_empty() {
            return Ok(());
        }

        let winner_grants = grants
            .iter()
            .filter(|g| g.reason == RewardReason::DisputeWon)
            .count();
        let correct_voters = grants.len() - winner_grants;
        self.rewards.distribute(grants).await?;

        metrics::REWARDS_GRANTED
            .with_label_values(&["dispute_won"])
            .inc_by(winner_grants as u64);
        metrics::REWARDS_GRANTED
            .with_label_values(&["correct_vote"])
            .inc_by(correct_voters as u64);
        info!(
            dispute = %dispute.id,
            winner = %winner,
            correct_voters,
            "💰 Dispute rewards distributed"
        );

        Ok(())
    }

    /// Current eligibility and weight for a voter, from their live snapshot.
    pub async fn voting_power(&self, user: &UserId) -> Result<VotingPower> {
        let snapshot = self
            .users
            .get(user)
            .await?
            .ok_or(DisputeError::UserNotFound(*user))?;
        Ok(self.evaluator.voting_power(&snapshot))
    }

    pub async fn get_dispute(&self, id: &DisputeId) -> Result<Dispute> {
        self.disputes.get_dispute(id).await
    }

    pub async fn list_disputes(&self, status: Option<DisputeStatus>) -> Result<Vec<Dispute>> {
        self.disputes.list_disputes(status).await
    }

    pub async fn get_resolution(&self, id: &DisputeId) -> Result<Option<Resolution>> {
        self.disputes.get_resolution(id).await
    }

    pub async fn votes_for(&self, id: &DisputeId) -> Result<Vec<Vote>> {
        self.disputes.votes_for(id).await
    }

    /// Reward history for a user, straight from the economics ledger.
    pub async fn rewards_for(&self, user: UserId) -> Result<Vec<panch_economics::RewardRecord>> {
        Ok(self.rewards.rewards_for(user).await?)
    }
}
