/*!
# Panch Reputation Module

Voting eligibility and vote-weight computation for the dispute arbitration
engine.

- **Eligibility**: a user may vote on disputes if they hold an
  arbitration-tier badge (Acharya or Guru) or a token balance at or above the
  eligibility floor.
- **Weight**: base weight 1, plus the increment of every badge held, plus one
  point per full token block.

Both computations are pure functions over a [`UserSnapshot`]: weight computed
at vote-cast time is stored on the vote and never recomputed, so later badge
or token changes cannot retroactively reweight a cast vote.
*/

mod evaluator;

pub use evaluator::{ReputationConfig, ReputationEvaluator, VotingPower};

pub use panch_types::UserSnapshot;
