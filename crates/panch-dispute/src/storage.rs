use crate::error::{DisputeError, Result};
use crate::types::{Dispute, DisputeStatus, Resolution, Vote};
use async_trait::async_trait;
use panch_types::{ContractId, ContractStatus, DisputeId, Engagement, UserId, UserSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Durable storage for disputes, votes, and resolutions.
///
/// Implementations own the atomicity guarantees the engine relies on: every
/// check-then-write below runs as one storage-level critical section, so
/// state transitions on a dispute are single-writer and vote uniqueness is a
/// storage constraint rather than an application-level check-then-insert.
#[async_trait]
pub trait DisputeStore: Send + Sync {
    /// Insert a new dispute. Fails with `DuplicateDispute` if the contract
    /// already has a non-terminal dispute; the check and insert are atomic.
    async fn insert_dispute(&self, dispute: Dispute) -> Result<()>;

    async fn get_dispute(&self, id: &DisputeId) -> Result<Dispute>;

    async fn list_disputes(&self, status: Option<DisputeStatus>) -> Result<Vec<Dispute>>;

    /// Record the counterparty response: compare-and-swap `Open` (with no
    /// responder on record) to `Responded`, appending `response_digest` to
    /// the evidence chain. Returns the updated dispute.
    async fn apply_response(
        &self,
        id: &DisputeId,
        responder: UserId,
        response: String,
        response_digest: String,
    ) -> Result<Dispute>;

    /// Insert a vote, enforcing `(dispute, voter)` uniqueness and the
    /// `Responded` voting window inside the critical section. Returns the
    /// consistent post-insert vote set for the dispute, so the caller's
    /// auto-resolution tally reads its own write.
    async fn insert_vote(&self, vote: Vote) -> Result<Vec<Vote>>;

    async fn votes_for(&self, id: &DisputeId) -> Result<Vec<Vote>>;

    /// Finalize a dispute: compare-and-swap any non-terminal status to
    /// `Resolved` and write the 1:1 resolution row. A second finalize on the
    /// same dispute fails with `AlreadyResolved`.
    async fn finalize(&self, resolution: Resolution) -> Result<Dispute>;

    async fn get_resolution(&self, id: &DisputeId) -> Result<Option<Resolution>>;
}

/// Contract persistence consumed from the platform (external collaborator).
#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn get(&self, id: &ContractId) -> Result<Option<Engagement>>;
    async fn set_status(&self, id: &ContractId, status: ContractStatus) -> Result<()>;
}

/// User snapshot lookups consumed from the platform (external collaborator).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, id: &UserId) -> Result<Option<UserSnapshot>>;
}

/// In-memory dispute store.
///
/// All check-then-write sequences hold the relevant write lock for their
/// whole critical section; lock order is disputes, then votes, then
/// resolutions.
pub struct MemoryDisputeStore {
    disputes: Arc<RwLock<HashMap<DisputeId, Dispute>>>,
    votes: Arc<RwLock<HashMap<DisputeId, Vec<Vote>>>>,
    resolutions: Arc<RwLock<HashMap<DisputeId, Resolution>>>,
}

impl Default for MemoryDisputeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDisputeStore {
    pub fn new() -> Self {
        Self {
            disputes: Arc::new(RwLock::new(HashMap::new())),
            votes: Arc::new(RwLock::new(HashMap::new())),
            resolutions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl DisputeStore for MemoryDisputeStore {
    async fn insert_dispute(&self, dispute: Dispute) -> Result<()> {
        let mut disputes = self.disputes.write().await;

        if disputes
            .values()
            .any(|d| d.contract == dispute.contract && !d.status.is_terminal())
        {
            return Err(DisputeError::DuplicateDispute(dispute.contract));
        }

        info!(
            dispute = %dispute.id,
            contract = %dispute.contract,
            storage_type = "memory",
            "💾 Dispute stored"
        );
        disputes.insert(dispute.id, dispute);
        Ok(())
    }

    async fn get_dispute(&self, id: &DisputeId) -> Result<Dispute> {
        let disputes = self.disputes.read().await;
        disputes
            .get(id)
            .cloned()
            .ok_or(DisputeError::DisputeNotFound(*id))
    }

    async fn list_disputes(&self, status: Option<DisputeStatus>) -> Result<Vec<Dispute>> {
        let disputes = self.disputes.read().await;
        let mut matching: Vec<Dispute> = disputes
            .values()
            .filter(|d| status.map_or(true, |s| d.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn apply_response(
        &self,
        id: &DisputeId,
        responder: UserId,
        response: String,
        response_digest: String,
    ) -> Result<Dispute> {
        let mut disputes = self.disputes.write().await;
        let dispute = disputes
            .get_mut(id)
            .ok_or(DisputeError::DisputeNotFound(*id))?;

        if dispute.status != DisputeStatus::Open {
            return Err(DisputeError::InvalidStatus {
                expected: "Open".to_string(),
                found: format!("{:?}", dispute.status),
            });
        }
        if dispute.responded_by.is_some() {
            return Err(DisputeError::DuplicateResponse);
        }

        dispute.responded_by = Some(responder);
        dispute.response = Some(response);
        dispute.status = DisputeStatus::Responded;
        dispute.evidence_hash = format!("{}-{}", dispute.evidence_hash, response_digest);

        Ok(dispute.clone())
    }

    async fn insert_vote(&self, vote: Vote) -> Result<Vec<Vote>> {
        let disputes = self.disputes.read().await;
        let dispute = disputes
            .get(&vote.dispute)
            .ok_or(DisputeError::DisputeNotFound(vote.dispute))?;

        if dispute.status != DisputeStatus::Responded {
            return Err(DisputeError::InvalidStatus {
                expected: "Responded".to_string(),
                found: format!("{:?}", dispute.status),
            });
        }

        // Unique (dispute, voter) index: checked and inserted under one lock
        let mut votes = self.votes.write().await;
        let dispute_votes = votes.entry(vote.dispute).or_default();
        if dispute_votes.iter().any(|v| v.voter == vote.voter) {
            return Err(DisputeError::DuplicateVote(vote.voter));
        }
        dispute_votes.push(vote);

        Ok(dispute_votes.clone())
    }

    async fn votes_for(&self, id: &DisputeId) -> Result<Vec<Vote>> {
        let votes = self.votes.read().await;
        Ok(votes.get(id).cloned().unwrap_or_default())
    }

    async fn finalize(&self, resolution: Resolution) -> Result<Dispute> {
        let mut disputes = self.disputes.write().await;
        let dispute = disputes
            .get_mut(&resolution.dispute)
            .ok_or(DisputeError::DisputeNotFound(resolution.dispute))?;

        let mut resolutions = self.resolutions.write().await;
        if dispute.status.is_terminal() || resolutions.contains_key(&resolution.dispute) {
            return Err(DisputeError::AlreadyResolved(resolution.dispute));
        }

        dispute.status = DisputeStatus::Resolved;
        resolutions.insert(resolution.dispute, resolution);

        Ok(dispute.clone())
    }

    async fn get_resolution(&self, id: &DisputeId) -> Result<Option<Resolution>> {
        let resolutions = self.resolutions.read().await;
        Ok(resolutions.get(id).cloned())
    }
}

/// In-memory contract store for wiring and tests.
pub struct MemoryContractStore {
    contracts: Arc<RwLock<HashMap<ContractId, Engagement>>>,
}

impl Default for MemoryContractStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContractStore {
    pub fn new() -> Self {
        Self {
            contracts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn upsert(&self, contract: Engagement) {
        let mut contracts = self.contracts.write().await;
        contracts.insert(contract.id, contract);
    }
}

#[async_trait]
impl ContractStore for MemoryContractStore {
    async fn get(&self, id: &ContractId) -> Result<Option<Engagement>> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(id).cloned())
    }

    async fn set_status(&self, id: &ContractId, status: ContractStatus) -> Result<()> {
        let mut contracts = self.contracts.write().await;
        let contract = contracts
            .get_mut(id)
            .ok_or(DisputeError::ContractNotFound(*id))?;
        contract.status = status;
        Ok(())
    }
}

/// In-memory user directory for wiring and tests.
pub struct MemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserSnapshot>>>,
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn upsert(&self, user: UserSnapshot) {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn get(&self, id: &UserId) -> Result<Option<UserSnapshot>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }
}
