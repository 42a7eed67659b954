use crate::types::RewardRecord;
use anyhow::Result;
use async_trait::async_trait;
use panch_types::{DisputeId, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

type BalanceMap = HashMap<UserId, u64>;
type LedgerBackup = Option<(BalanceMap, usize)>;

/// Durable storage for the reward ledger and the denormalized balances.
///
/// Implementations must apply `begin`/`commit`/`rollback` framing so a batch
/// of rewards lands atomically: either every ledger row and balance update
/// commits, or none do.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    async fn get_balance(&self, user: UserId) -> Result<u64>;
    async fn set_balance(&self, user: UserId, balance: u64) -> Result<()>;

    async fn append_reward(&self, record: RewardRecord) -> Result<()>;
    async fn rewards_for(&self, user: UserId) -> Result<Vec<RewardRecord>>;
    async fn rewards_for_dispute(&self, dispute: DisputeId) -> Result<Vec<RewardRecord>>;

    async fn begin_transaction(&self) -> Result<()>;
    async fn commit_transaction(&self) -> Result<()>;
    async fn rollback_transaction(&self) -> Result<()>;
}

/// In-memory reference implementation with snapshot-based rollback.
pub struct MemoryLedgerStorage {
    balances: Arc<RwLock<BalanceMap>>,
    rewards: Arc<RwLock<Vec<RewardRecord>>>,
    backup: Arc<RwLock<LedgerBackup>>,
}

impl Default for MemoryLedgerStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerStorage {
    pub fn new() -> Self {
        Self {
            balances: Arc::new(RwLock::new(HashMap::new())),
            rewards: Arc::new(RwLock::new(Vec::new())),
            backup: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl LedgerStorage for MemoryLedgerStorage {
    async fn get_balance(&self, user: UserId) -> Result<u64> {
        let balances = self.balances.read().await;
        Ok(balances.get(&user).copied().unwrap_or(0))
    }

    async fn set_balance(&self, user: UserId, balance: u64) -> Result<()> {
        let mut balances = self.balances.write().await;
        if balance == 0 {
            balances.remove(&user);
        } else {
            balances.insert(user, balance);
        }
        Ok(())
    }

    async fn append_reward(&self, record: RewardRecord) -> Result<()> {
        let mut rewards = self.rewards.write().await;
        info!(
            user = %record.user,
            amount = record.amount,
            reason = %record.reason,
            ledger_size = rewards.len() + 1,
            storage_type = "memory",
            "📦 Reward recorded"
        );
        rewards.push(record);
        Ok(())
    }

    async fn rewards_for(&self, user: UserId) -> Result<Vec<RewardRecord>> {
        let rewards = self.rewards.read().await;
        Ok(rewards.iter().filter(|r| r.user == user).cloned().collect())
    }

    async fn rewards_for_dispute(&self, dispute: DisputeId) -> Result<Vec<RewardRecord>> {
        let rewards = self.rewards.read().await;
        Ok(rewards
            .iter()
            .filter(|r| r.dispute == Some(dispute))
            .cloned()
            .collect())
    }

    async fn begin_transaction(&self) -> Result<()> {
        let balances = self.balances.read().await;
        let rewards = self.rewards.read().await;

        let mut backup = self.backup.write().await;
        *backup = Some((balances.clone(), rewards.len()));

        info!(
            accounts = balances.len(),
            ledger_size = rewards.len(),
            storage_type = "memory",
            "📝 Ledger transaction began (snapshot created)"
        );
        Ok(())
    }

    async fn commit_transaction(&self) -> Result<()> {
        let mut backup = self.backup.write().await;
        if backup.take().is_some() {
            info!(
                storage_type = "memory",
                "✅ Ledger transaction committed (snapshot discarded)"
            );
        }
        Ok(())
    }

    async fn rollback_transaction(&self) -> Result<()> {
        let mut backup = self.backup.write().await;

        if let Some((balance_backup, ledger_len)) = backup.take() {
            let mut balances = self.balances.write().await;
            let mut rewards = self.rewards.write().await;

            *balances = balance_backup;
            rewards.truncate(ledger_len);

            info!(
                accounts = balances.len(),
                ledger_size = rewards.len(),
                storage_type = "memory",
                "❌ Ledger transaction rolled back (snapshot restored)"
            );
        }

        Ok(())
    }
}
