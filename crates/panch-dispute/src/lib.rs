/*!
Dispute arbitration for engagement contracts.

A dispute moves through a three-state lifecycle: `Open` when a contract
party raises it, `Responded` once the counterparty answers, `Resolved` when
an arbiter or a vote supermajority picks a winner. While a dispute is in
`Responded`, eligible community members cast reputation-weighted votes; at
five or more ballots, a side holding strictly more than 60% of the cast
weight triggers automatic resolution. Resolution completes the underlying
contract and distributes token rewards through the economics ledger.
*/

pub mod engine;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod storage;
pub mod types;

pub use engine::{ArbitrationConfig, ArbitrationEngine};
pub use error::{DisputeError, Result};
pub use ledger::VoteLedger;
pub use storage::{
    ContractStore, DisputeStore, MemoryContractStore, MemoryDisputeStore, MemoryUserDirectory,
    UserDirectory,
};
pub use types::{Dispute, DisputeStatus, Resolution, Resolver, Vote, VoteTally};
