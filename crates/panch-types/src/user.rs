use crate::badge::{BadgeTier, Role};
use crate::id::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Point-in-time view of a user's reputation-relevant state.
///
/// Eligibility and vote weight are computed over this snapshot; a weight
/// stored at vote-cast time stays valid even if the live user record changes
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: UserId,
    pub role: Role,
    pub badges: BTreeSet<BadgeTier>,
    pub tokens: u64,
}

impl UserSnapshot {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            badges: BTreeSet::new(),
            tokens: 0,
        }
    }

    pub fn with_badge(mut self, badge: BadgeTier) -> Self {
        self.badges.insert(badge);
        self
    }

    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn has_badge(&self, badge: BadgeTier) -> bool {
        self.badges.contains(&badge)
    }

    /// Whether any held badge grants arbitration privileges.
    pub fn holds_arbitration_badge(&self) -> bool {
        self.badges.iter().any(|b| b.grants_arbitration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builder() {
        let user = UserSnapshot::new(UserId::from_bytes([1; 32]), Role::Student)
            .with_badge(BadgeTier::Shiksharthi)
            .with_badge(BadgeTier::Guru)
            .with_tokens(250);

        assert!(user.has_badge(BadgeTier::Guru));
        assert!(!user.has_badge(BadgeTier::Acharya));
        assert!(user.holds_arbitration_badge());
        assert_eq!(user.tokens, 250);
    }

    #[test]
    fn test_badge_set_deduplicates() {
        let user = UserSnapshot::new(UserId::from_bytes([2; 32]), Role::Employer)
            .with_badge(BadgeTier::SikshaSevi)
            .with_badge(BadgeTier::SikshaSevi);
        assert_eq!(user.badges.len(), 1);
    }
}
