//! Prometheus metrics for the arbitration engine.
//!
//! Tracks dispute lifecycle transitions, voting activity, and reward
//! distribution.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Disputes raised
pub static DISPUTES_RAISED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("panch_disputes_raised_total", "Total disputes raised").unwrap()
});

/// Dispute responses recorded
pub static DISPUTE_RESPONSES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "panch_dispute_responses_total",
        "Total dispute responses recorded"
    )
    .unwrap()
});

/// Votes cast
pub static VOTES_CAST: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("panch_dispute_votes_cast_total", "Total dispute votes cast").unwrap()
});

/// Vote validation failures
pub static VOTE_VALIDATION_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "panch_dispute_vote_validation_failures_total",
        "Total vote validation failures",
        &["reason"]
    )
    .unwrap()
});

/// Resolutions by trigger (manual arbiter vs. auto supermajority)
pub static RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "panch_dispute_resolutions_total",
        "Total dispute resolutions",
        &["trigger"]
    )
    .unwrap()
});

/// Token rewards granted
pub static REWARDS_GRANTED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "panch_dispute_rewards_granted_total",
        "Total token rewards granted on resolution",
        &["reason"]
    )
    .unwrap()
});

/// Dispute id computations
pub static DISPUTE_ID_COMPUTATIONS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "panch_dispute_id_computations_total",
        "Total canonical dispute id computations"
    )
    .unwrap()
});

/// Tally computation time
pub static TALLY_TIME: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "panch_dispute_tally_seconds",
        "Time to tally weighted votes for a dispute"
    )
    .unwrap()
});
