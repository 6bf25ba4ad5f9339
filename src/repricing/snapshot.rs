//! Snapshot, rate state and bounds value types
use odra::prelude::*;
use odra::casper_types::U256;
use crate::math::{percent, wad, SafeMath};
use crate::errors::MathError;

/// Twelve hours, in milliseconds of block time
pub const DEFAULT_MINIMUM_REPRICE_INTERVAL: u64 = 12 * 60 * 60 * 1000;

/// One day, in milliseconds of block time
pub const DEFAULT_RESERVES_MAX_STALENESS: u64 = 24 * 60 * 60 * 1000;

/// An off-chain yield report
#[odra::odra_type]
pub struct RepriceSnapshot {
    /// Reserves backing the token before this period's rewards
    pub pre_reward_reserves: U256,
    /// Rewards earned since the last snapshot
    pub new_rewards: U256,
    /// Token supply the report was computed against
    pub reported_supply: U256,
    /// Position in the linear snapshot history, starting at 1
    pub sequence: u64,
    /// Block time the snapshot was accepted at
    pub timestamp: u64,
}

impl RepriceSnapshot {
    /// Reserves after rewards
    pub fn total_reserves(&self) -> Result<U256, MathError> {
        SafeMath::add(self.pre_reward_reserves, self.new_rewards)
    }
}

/// The last accepted snapshot and the rate it produced
#[odra::odra_type]
pub struct RateState {
    /// None until the first successful reprice
    pub last_snapshot: Option<RepriceSnapshot>,
    /// Underlying per liquid token, wad-scaled
    pub current_rate: U256,
    /// Block time of the last successful reprice
    pub last_reprice_time: u64,
}

impl RateState {
    /// Parity, with no history
    pub fn initial() -> Self {
        Self {
            last_snapshot: None,
            current_rate: wad(),
            last_reprice_time: 0,
        }
    }

    /// Sequence number the next accepted snapshot receives
    pub fn next_sequence(&self) -> u64 {
        self.last_snapshot.as_ref().map_or(1, |snapshot| snapshot.sequence + 1)
    }
}

impl Default for RateState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Process-wide repricing limits and reward percentages (all wad-scaled)
#[odra::odra_type]
pub struct RepricingBounds {
    /// Cooldown between accepted snapshots, in milliseconds
    pub minimum_reprice_interval: u64,
    /// Largest accepted relative move of the rate
    pub max_rate_delta: U256,
    /// Largest accepted gap between reported and actual supply
    pub max_supply_delta: U256,
    /// Share of new rewards paid to the treasury
    pub treasury_reward_percentage: U256,
    /// Share of new rewards paid to node operators
    pub node_operator_reward_percentage: U256,
}

impl RepricingBounds {
    /// Treasury plus node-operator percentage
    pub fn reward_percentage_total(&self) -> Result<U256, MathError> {
        SafeMath::add(self.treasury_reward_percentage, self.node_operator_reward_percentage)
    }
}

impl Default for RepricingBounds {
    fn default() -> Self {
        Self {
            minimum_reprice_interval: DEFAULT_MINIMUM_REPRICE_INTERVAL,
            max_rate_delta: percent(1),
            max_supply_delta: percent(1),
            treasury_reward_percentage: percent(5),
            node_operator_reward_percentage: percent(5),
        }
    }
}
