use crate::storage::LedgerStorage;
use crate::types::{RewardRecord, RewardReason};
use anyhow::Result;
use chrono::Utc;
use panch_types::{DisputeId, UserId};
use std::sync::Arc;
use tracing::info;

/// One pending reward within a distribution batch.
#[derive(Debug, Clone)]
pub struct RewardGrant {
    pub user: UserId,
    pub amount: u64,
    pub reason: RewardReason,
    pub dispute: Option<DisputeId>,
}

/// Token reward ledger.
///
/// The append-only reward rows are the source of truth; the per-user balance
/// is a materialized cache updated inside the same storage transaction as
/// the row append.
pub struct RewardLedger {
    storage: Arc<dyn LedgerStorage>,
}

impl RewardLedger {
    pub fn new(storage: Arc<dyn LedgerStorage>) -> Self {
        Self { storage }
    }

    /// Grant a single reward atomically.
    pub async fn credit(
        &self,
        user: UserId,
        amount: u64,
        reason: RewardReason,
        dispute: Option<DisputeId>,
    ) -> Result<()> {
        self.distribute(vec![RewardGrant {
            user,
            amount,
            reason,
            dispute,
        }])
        .await
    }

    /// Apply a batch of rewards as one unit: all rows and balance updates
    /// commit together or the whole batch rolls back.
    pub async fn distribute(&self, grants: Vec<RewardGrant>) -> Result<()> {
        if grants.is_empty() {
            return Ok(());
        }

        self.storage.begin_transaction().await?;

        match self.distribute_internal(&grants).await {
            Ok(total) => {
                self.storage.commit_transaction().await?;
                info!(
                    grants = grants.len(),
                    total_tokens = total,
                    "💰 Reward distribution committed"
                );
                Ok(())
            }
            Err(e) => {
                info!(
                    grants = grants.len(),
                    error = %e,
                    "❌ Reward distribution rolled back"
                );
                self.storage.rollback_transaction().await?;
                Err(e)
            }
        }
    }

    async fn distribute_internal(&self, grants: &[RewardGrant]) -> Result<u64> {
        let mut total = 0u64;

        for grant in grants {
            let current = self.storage.get_balance(grant.user).await?;
            let new_balance = current
                .checked_add(grant.amount)
                .ok_or_else(|| anyhow::anyhow!("Balance overflow for {}", grant.user))?;

            self.storage
                .append_reward(RewardRecord {
                    user: grant.user,
                    amount: grant.amount,
                    reason: grant.reason,
                    dispute: grant.dispute,
                    timestamp: Utc::now(),
                })
                .await?;
            self.storage.set_balance(grant.user, new_balance).await?;

            info!(
                user = %grant.user,
                amount = grant.amount,
                reason = %grant.reason,
                balance_before = current,
                balance_after = new_balance,
                "💰 Reward credited"
            );

            total += grant.amount;
        }

        Ok(total)
    }

    /// Current spendable balance (the materialized cache).
    pub async fn balance_of(&self, user: UserId) -> Result<u64> {
        self.storage.get_balance(user).await
    }

    /// Full reward history for a user, the `ListUserRewards` query surface.
    pub async fn rewards_for(&self, user: UserId) -> Result<Vec<RewardRecord>> {
        self.storage.rewards_for(user).await
    }

    /// Rows keyed to one dispute: the idempotency lookup a resumed
    /// distribution uses to skip grants that already committed.
    pub async fn rewards_for_dispute(&self, dispute: DisputeId) -> Result<Vec<RewardRecord>> {
        self.storage.rewards_for_dispute(dispute).await
    }
}
