/*!
# Panch Economics Module

Token rewards for dispute participants.

The append-only [`RewardRecord`] ledger is the source of truth for what a
user has earned; the per-user balance is a denormalized cache maintained
behind the same storage transaction as the ledger write, so concurrent
grants cannot produce lost updates. Rewards are never reversed.
*/

pub mod ledger;
pub mod storage;
pub mod types;

pub use ledger::{RewardGrant, RewardLedger};
pub use storage::{LedgerStorage, MemoryLedgerStorage};
pub use types::{RewardReason, RewardRecord};
