use serde::{Deserialize, Serialize};

/// Reputation badge tiers awarded by the platform, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeTier {
    Shiksharthi,
    SikshaSevi,
    UtsaahiIntern,
    Acharya,
    Guru,
}

impl BadgeTier {
    /// Vote-weight increment contributed by this badge.
    ///
    /// Increments are summed over every badge a user holds, not just the
    /// highest tier.
    pub fn weight_bonus(&self) -> u64 {
        match self {
            BadgeTier::Shiksharthi => 1,
            BadgeTier::SikshaSevi => 2,
            BadgeTier::UtsaahiIntern => 2,
            BadgeTier::Acharya => 3,
            BadgeTier::Guru => 5,
        }
    }

    /// Whether this badge alone grants arbitration privileges: eligibility
    /// to vote on disputes and to manually resolve them.
    pub fn grants_arbitration(&self) -> bool {
        matches!(self, BadgeTier::Acharya | BadgeTier::Guru)
    }
}

/// Platform role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Employer,
    Admin,
}
