//! Event definitions for repricing
use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when a snapshot is accepted
#[odra::event]
pub struct Repriced {
    /// Position of the snapshot in the history
    pub sequence: u64,
    pub pre_reward_reserves: U256,
    pub new_rewards: U256,
    pub reported_supply: U256,
    /// Rate before the snapshot
    pub old_rate: U256,
    /// Rate after the snapshot
    pub new_rate: U256,
    /// Liquid tokens minted to the treasury
    pub treasury_reward: U256,
    /// Liquid tokens minted to node operators, all operators together
    pub node_operator_reward: U256,
    /// Reserves after rewards
    pub total_value_deposited: U256,
    pub timestamp: u64,
}

/// Event emitted for each operator paid by a reprice
#[odra::event]
pub struct NodeOperatorRewarded {
    pub sequence: u64,
    pub reward_address: Address,
    pub amount: U256,
}

/// Event emitted when the minimum reprice interval changes
#[odra::event]
pub struct MinimumRepriceIntervalUpdated {
    pub old_interval: u64,
    pub new_interval: u64,
}

/// Event emitted when the maximum rate delta changes
#[odra::event]
pub struct MaxRateDeltaUpdated {
    pub old_delta: U256,
    pub new_delta: U256,
}

/// Event emitted when the maximum supply delta changes
#[odra::event]
pub struct MaxSupplyDeltaUpdated {
    pub old_delta: U256,
    pub new_delta: U256,
}

/// Event emitted when the treasury reward percentage changes
#[odra::event]
pub struct TreasuryRewardPercentageUpdated {
    pub old_percentage: U256,
    pub new_percentage: U256,
}

/// Event emitted when the node-operator reward percentage changes
#[odra::event]
pub struct NodeOperatorRewardPercentageUpdated {
    pub old_percentage: U256,
    pub new_percentage: U256,
}

/// Event emitted when the reserves attestation source is set or cleared
#[odra::event]
pub struct ReservesAttestationUpdated {
    pub old_source: Option<Address>,
    pub new_source: Option<Address>,
}

/// Event emitted when the attestation tolerance changes
#[odra::event]
pub struct ReservesToleranceUpdated {
    pub old_tolerance: U256,
    pub new_tolerance: U256,
}

/// Event emitted when the oldest acceptable attestation age changes
#[odra::event]
pub struct ReservesMaxStalenessUpdated {
    pub old_max_staleness: u64,
    pub new_max_staleness: u64,
}

/// Event emitted when the treasury address changes
#[odra::event]
pub struct TreasuryUpdated {
    pub old_treasury: Address,
    pub new_treasury: Address,
}
