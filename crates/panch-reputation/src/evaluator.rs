use panch_types::UserSnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunable thresholds for eligibility and weight computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationConfig {
    /// Token balance that grants voting eligibility on its own.
    pub eligibility_token_floor: u64,
    /// Tokens per additional weight point (`floor(tokens / tokens_per_point)`).
    pub tokens_per_point: u64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            eligibility_token_floor: 100,
            tokens_per_point: 100,
        }
    }
}

/// Result of a voting-power query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPower {
    pub weight: u64,
    pub can_vote: bool,
}

/// Computes voting eligibility and vote weight from a user snapshot.
///
/// Pure and deterministic: the same snapshot always yields the same answer,
/// with no I/O and no clock reads.
#[derive(Debug, Clone, Default)]
pub struct ReputationEvaluator {
    config: ReputationConfig,
}

impl ReputationEvaluator {
    pub fn new(config: ReputationConfig) -> Self {
        Self { config }
    }

    /// Whether the user may cast dispute votes.
    ///
    /// True iff the user holds an arbitration-tier badge or a token balance
    /// at or above the eligibility floor. An unknown user is simply
    /// ineligible; there is no snapshot to evaluate.
    pub fn can_vote(&self, user: &UserSnapshot) -> bool {
        user.holds_arbitration_badge() || user.tokens >= self.config.eligibility_token_floor
    }

    /// Vote weight: `1 + Σ badge bonus + floor(tokens / tokens_per_point)`.
    ///
    /// Every badge contributes its increment, not just the highest tier.
    /// Always ≥ 1 and monotone in both token balance and badge set.
    pub fn vote_weight(&self, user: &UserSnapshot) -> u64 {
        let badge_bonus: u64 = user.badges.iter().map(|b| b.weight_bonus()).sum();
        let token_bonus = user.tokens / self.config.tokens_per_point;
        let weight = 1 + badge_bonus + token_bonus;

        debug!(
            user = %user.id,
            badges = user.badges.len(),
            badge_bonus,
            token_bonus,
            weight,
            "Vote weight computed"
        );

        weight
    }

    /// Combined eligibility + weight, the `GetVotingPower` query surface.
    pub fn voting_power(&self, user: &UserSnapshot) -> VotingPower {
        VotingPower {
            weight: self.vote_weight(user),
            can_vote: self.can_vote(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panch_types::{BadgeTier, Role, UserId};

    fn user(n: u8) -> UserSnapshot {
        UserSnapshot::new(UserId::from_bytes([n; 32]), Role::Student)
    }

    #[test]
    fn test_base_weight_is_one() {
        let evaluator = ReputationEvaluator::default();
        assert_eq!(evaluator.vote_weight(&user(1)), 1);
    }

    #[test]
    fn test_badge_bonuses_sum_over_all_badges() {
        let evaluator = ReputationEvaluator::default();

        // 1 (base) + 1 + 2 + 2 + 3 + 5 = 14
        let collector = user(2)
            .with_badge(BadgeTier::Shiksharthi)
            .with_badge(BadgeTier::SikshaSevi)
            .with_badge(BadgeTier::UtsaahiIntern)
            .with_badge(BadgeTier::Acharya)
            .with_badge(BadgeTier::Guru);
        assert_eq!(evaluator.vote_weight(&collector), 14);
    }

    #[test]
    fn test_token_bonus_floors() {
        let evaluator = ReputationEvaluator::default();

        assert_eq!(evaluator.vote_weight(&user(3).with_tokens(99)), 1);
        assert_eq!(evaluator.vote_weight(&user(3).with_tokens(100)), 2);
        assert_eq!(evaluator.vote_weight(&user(3).with_tokens(199)), 2);
        assert_eq!(evaluator.vote_weight(&user(3).with_tokens(550)), 6);
    }

    #[test]
    fn test_weight_monotone_in_tokens_and_badges() {
        let evaluator = ReputationEvaluator::default();

        let mut previous = 0;
        for tokens in [0, 50, 100, 250, 1000, 10_000] {
            let w = evaluator.vote_weight(&user(4).with_tokens(tokens));
            assert!(w >= previous);
            assert!(w >= 1);
            previous = w;
        }

        let bare = evaluator.vote_weight(&user(5));
        let badged = evaluator.vote_weight(&user(5).with_badge(BadgeTier::Shiksharthi));
        assert!(badged > bare);
    }

    #[test]
    fn test_eligibility_by_badge() {
        let evaluator = ReputationEvaluator::default();

        assert!(evaluator.can_vote(&user(6).with_badge(BadgeTier::Acharya)));
        assert!(evaluator.can_vote(&user(6).with_badge(BadgeTier::Guru)));
        assert!(!evaluator.can_vote(&user(6).with_badge(BadgeTier::Shiksharthi)));
        assert!(!evaluator.can_vote(&user(6).with_badge(BadgeTier::UtsaahiIntern)));
    }

    #[test]
    fn test_eligibility_by_token_floor() {
        let evaluator = ReputationEvaluator::default();

        assert!(!evaluator.can_vote(&user(7).with_tokens(99)));
        assert!(evaluator.can_vote(&user(7).with_tokens(100)));
        assert!(evaluator.can_vote(&user(7).with_tokens(5_000)));
    }

    #[test]
    fn test_voting_power_query() {
        let evaluator = ReputationEvaluator::default();

        let power = evaluator.voting_power(&user(8).with_badge(BadgeTier::Guru).with_tokens(300));
        // 1 + 5 + 3
        assert_eq!(power, VotingPower { weight: 9, can_vote: true });

        let power = evaluator.voting_power(&user(8).with_tokens(40));
        assert_eq!(power, VotingPower { weight: 1, can_vote: false });
    }

    #[test]
    fn test_determinism_across_calls() {
        let evaluator = ReputationEvaluator::default();
        let snapshot = user(9).with_badge(BadgeTier::SikshaSevi).with_tokens(321);

        let first = evaluator.vote_weight(&snapshot);
        for _ in 0..10 {
            assert_eq!(evaluator.vote_weight(&snapshot), first);
        }
    }
}
