//! Rate Engine - exchange rate storage and the reprice entry point
//!
//! Holds the current rate between the liquid token and its underlying
//! asset. The only way to move the rate is `submit_snapshot`, which runs
//! the validator, mints the reward fee and commits the new state in one
//! call. Any failure reverts the whole call.
//!
//! The engine mints through the liquid token, so it must hold the token's
//! `Minter` role.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::RepricingError;
use super::events::*;
use super::rewards;
use super::snapshot::{RateState, RepriceSnapshot, RepricingBounds, DEFAULT_RESERVES_MAX_STALENESS};
use super::validator::{self, AdmissionContext, ReservesCheck};
use crate::access::{
    self, AccessControl, OwnershipTransferStarted, OwnershipTransferred, Role, RoleGranted,
    RoleRevoked,
};
use crate::attestation::ReservesAttestationContractRef;
use crate::math::{wad, FixedPoint};
use crate::operators::OperatorRegistryContractRef;
use crate::token::LiquidTokenContractRef;

/// Rate Engine contract
#[odra::module(events = [
    Repriced,
    NodeOperatorRewarded,
    MinimumRepriceIntervalUpdated,
    MaxRateDeltaUpdated,
    MaxSupplyDeltaUpdated,
    TreasuryRewardPercentageUpdated,
    NodeOperatorRewardPercentageUpdated,
    ReservesAttestationUpdated,
    ReservesToleranceUpdated,
    ReservesMaxStalenessUpdated,
    TreasuryUpdated,
    OwnershipTransferStarted,
    OwnershipTransferred,
    RoleGranted,
    RoleRevoked
])]
pub struct RateEngine {
    /// Owner and repricer role
    access: SubModule<AccessControl>,
    /// Liquid token whose supply is checked and minted
    liquid_token: Var<Address>,
    /// Source of node-operator reward shares
    operator_registry: Var<Address>,
    /// Recipient of the treasury reward
    treasury: Var<Address>,
    /// Optional proof-of-reserves feed
    reserves_attestation: Var<Option<Address>>,
    /// Largest accepted gap to the attested reserves
    reserves_tolerance: Var<U256>,
    /// Oldest accepted attestation, in milliseconds
    reserves_max_staleness: Var<u64>,
    bounds: Var<RepricingBounds>,
    state: Var<RateState>,
    /// Reserves after rewards as of the last reprice
    total_value_deposited: Var<U256>,
    /// Reentrancy lock
    locked: Var<bool>,
}

#[odra::module]
impl RateEngine {
    /// Initialize the engine at parity, owned by the deployer
    pub fn init(
        &mut self,
        liquid_token: Address,
        operator_registry: Address,
        treasury: Address,
        bounds: RepricingBounds,
    ) {
        if access::is_null(&liquid_token)
            || access::is_null(&operator_registry)
            || access::is_null(&treasury)
        {
            self.env().revert(RepricingError::AddressNull);
        }
        if bounds.max_rate_delta > wad() || bounds.max_supply_delta > wad() {
            self.env().revert(RepricingError::InvalidPercentage);
        }
        if let Err(error) = rewards::check_reward_percentages(
            bounds.treasury_reward_percentage,
            bounds.node_operator_reward_percentage,
        ) {
            self.env().revert(error);
        }

        let caller = self.env().caller();
        self.access.init(caller);
        self.liquid_token.set(liquid_token);
        self.operator_registry.set(operator_registry);
        self.treasury.set(treasury);
        self.reserves_attestation.set(None);
        self.reserves_tolerance.set(U256::zero());
        self.reserves_max_staleness.set(DEFAULT_RESERVES_MAX_STALENESS);
        self.bounds.set(bounds);
        self.state.set(RateState::initial());
        self.total_value_deposited.set(U256::zero());
        self.locked.set(false);
    }

    /// Submit an off-chain yield report (repricer only)
    ///
    /// # Returns
    /// The new rate, underlying per liquid token
    pub fn submit_snapshot(
        &mut self,
        pre_reward_reserves: U256,
        new_rewards: U256,
        reported_supply: U256,
    ) -> U256 {
        self.access.assert_role(Role::Repricer);
        self.lock();

        let now = self.env().get_block_time();
        let prior = self.rate_state();
        let bounds = self.bounds();
        let mut token = LiquidTokenContractRef::new(self.env(), self.liquid_token());

        let proposed = RepriceSnapshot {
            pre_reward_reserves,
            new_rewards,
            reported_supply,
            sequence: prior.next_sequence(),
            timestamp: now,
        };
        let context = AdmissionContext {
            now,
            actual_supply: token.total_supply(),
            reserves: self.reserves_check(),
        };

        let computation = validator::admit(&proposed, &prior, &bounds, &context)
            .unwrap_or_else(|rejection| self.env().revert(RepricingError::from(rejection)));

        let split = rewards::split(
            computation.liquid_to_mint,
            bounds.treasury_reward_percentage,
            bounds.node_operator_reward_percentage,
        )
        .unwrap_or_else(|error| self.env().revert(RepricingError::from(error)));

        let operator_rewards = if split.node_operators.is_zero() {
            Vec::new()
        } else {
            let registry = OperatorRegistryContractRef::new(self.env(), self.operator_registry());
            rewards::distribute(split.node_operators, &registry.reward_shares())
                .unwrap_or_else(|error| self.env().revert(error))
        };

        // Commit the new state before calling out to the token.
        let sequence = proposed.sequence;
        self.state.set(RateState {
            last_snapshot: Some(proposed),
            current_rate: computation.new_rate,
            last_reprice_time: now,
        });
        self.total_value_deposited.set(computation.total_reserves);

        if !split.treasury.is_zero() {
            token.mint(self.treasury(), split.treasury);
        }
        let mut node_operator_reward = U256::zero();
        for (reward_address, amount) in operator_rewards {
            if amount.is_zero() {
                continue;
            }
            token.mint(reward_address, amount);
            node_operator_reward += amount;
            self.env().emit_event(NodeOperatorRewarded {
                sequence,
                reward_address,
                amount,
            });
        }

        self.env().emit_event(Repriced {
            sequence,
            pre_reward_reserves,
            new_rewards,
            reported_supply,
            old_rate: prior.current_rate,
            new_rate: computation.new_rate,
            treasury_reward: split.treasury,
            node_operator_reward,
            total_value_deposited: computation.total_reserves,
            timestamp: now,
        });

        self.unlock();
        computation.new_rate
    }

    // Bounds configuration (owner only)

    /// Set the cooldown between accepted snapshots, in milliseconds (owner only)
    pub fn set_minimum_reprice_interval(&mut self, new_interval: u64) {
        self.access.assert_owner();
        let mut bounds = self.bounds();
        let old_interval = bounds.minimum_reprice_interval;
        bounds.minimum_reprice_interval = new_interval;
        self.bounds.set(bounds);
        self.env().emit_event(MinimumRepriceIntervalUpdated {
            old_interval,
            new_interval,
        });
    }

    /// Set the largest accepted relative rate move (owner only)
    pub fn set_max_rate_delta(&mut self, new_delta: U256) {
        self.access.assert_owner();
        self.ensure_percentage(new_delta);
        let mut bounds = self.bounds();
        let old_delta = bounds.max_rate_delta;
        bounds.max_rate_delta = new_delta;
        self.bounds.set(bounds);
        self.env().emit_event(MaxRateDeltaUpdated { old_delta, new_delta });
    }

    /// Set the largest accepted gap between reported and actual supply (owner only)
    pub fn set_max_supply_delta(&mut self, new_delta: U256) {
        self.access.assert_owner();
        self.ensure_percentage(new_delta);
        let mut bounds = self.bounds();
        let old_delta = bounds.max_supply_delta;
        bounds.max_supply_delta = new_delta;
        self.bounds.set(bounds);
        self.env().emit_event(MaxSupplyDeltaUpdated { old_delta, new_delta });
    }

    /// Fails with `RewardPercentageTotalOverflow` if the two reward
    /// percentages would exceed 100% together
    pub fn set_treasury_reward_percentage(&mut self, new_percentage: U256) {
        self.access.assert_owner();
        let mut bounds = self.bounds();
        if let Err(error) =
            rewards::check_reward_percentages(new_percentage, bounds.node_operator_reward_percentage)
        {
            self.env().revert(error);
        }
        let old_percentage = bounds.treasury_reward_percentage;
        bounds.treasury_reward_percentage = new_percentage;
        self.bounds.set(bounds);
        self.env().emit_event(TreasuryRewardPercentageUpdated {
            old_percentage,
            new_percentage,
        });
    }

    /// Same limits as `set_treasury_reward_percentage`
    pub fn set_node_operator_reward_percentage(&mut self, new_percentage: U256) {
        self.access.assert_owner();
        let mut bounds = self.bounds();
        if let Err(error) =
            rewards::check_reward_percentages(bounds.treasury_reward_percentage, new_percentage)
        {
            self.env().revert(error);
        }
        let old_percentage = bounds.node_operator_reward_percentage;
        bounds.node_operator_reward_percentage = new_percentage;
        self.bounds.set(bounds);
        self.env().emit_event(NodeOperatorRewardPercentageUpdated {
            old_percentage,
            new_percentage,
        });
    }

    /// Set or clear the proof-of-reserves feed (owner only)
    pub fn set_reserves_attestation(&mut self, new_source: Option<Address>) {
        self.access.assert_owner();
        let old_source = self.reserves_attestation();
        self.reserves_attestation.set(new_source);
        self.env().emit_event(ReservesAttestationUpdated {
            old_source,
            new_source,
        });
    }

    /// Set the largest accepted gap to the attested reserves (owner only)
    pub fn set_reserves_tolerance(&mut self, new_tolerance: U256) {
        self.access.assert_owner();
        self.ensure_percentage(new_tolerance);
        let old_tolerance = self.reserves_tolerance();
        self.reserves_tolerance.set(new_tolerance);
        self.env().emit_event(ReservesToleranceUpdated {
            old_tolerance,
            new_tolerance,
        });
    }

    /// Set how old an attestation may be when a snapshot is checked against it (owner only)
    pub fn set_reserves_max_staleness(&mut self, new_max_staleness: u64) {
        self.access.assert_owner();
        let old_max_staleness = self.reserves_max_staleness();
        self.reserves_max_staleness.set(new_max_staleness);
        self.env().emit_event(ReservesMaxStalenessUpdated {
            old_max_staleness,
            new_max_staleness,
        });
    }

    /// Set the treasury reward recipient (owner only)
    pub fn set_treasury(&mut self, new_treasury: Address) {
        self.access.assert_owner();
        if access::is_null(&new_treasury) {
            self.env().revert(RepricingError::AddressNull);
        }
        let old_treasury = self.treasury();
        self.treasury.set(new_treasury);
        self.env().emit_event(TreasuryUpdated {
            old_treasury,
            new_treasury,
        });
    }

    // View functions

    /// Underlying per liquid token, wad-scaled; parity before the first reprice
    pub fn current_rate_to_underlying(&self) -> U256 {
        self.rate_state().current_rate
    }

    /// Liquid token per underlying, wad-scaled
    pub fn current_rate_from_underlying(&self) -> U256 {
        FixedPoint::reciprocal(self.current_rate_to_underlying())
            .unwrap_or_else(|error| self.env().revert(RepricingError::from(error)))
    }

    /// Value of `amount` liquid tokens in the underlying asset
    pub fn liquid_to_underlying(&self, amount: U256) -> U256 {
        FixedPoint::convert(amount, self.current_rate_to_underlying())
            .unwrap_or_else(|error| self.env().revert(RepricingError::from(error)))
    }

    /// Liquid tokens worth `amount` of the underlying asset
    pub fn underlying_to_liquid(&self, amount: U256) -> U256 {
        FixedPoint::ratio(amount, self.current_rate_to_underlying())
            .unwrap_or_else(|error| self.env().revert(RepricingError::from(error)))
    }

    /// Last accepted snapshot; None before the first reprice
    pub fn last_snapshot(&self) -> Option<RepriceSnapshot> {
        self.rate_state().last_snapshot
    }

    /// Block time of the last accepted snapshot
    pub fn last_reprice_time(&self) -> u64 {
        self.rate_state().last_reprice_time
    }

    /// Milliseconds until the next snapshot can be accepted
    pub fn remaining_cooldown(&self) -> u64 {
        validator::remaining_cooldown(&self.rate_state(), &self.bounds(), self.env().get_block_time())
    }

    /// Current repricing bounds and reward percentages
    pub fn bounds(&self) -> RepricingBounds {
        self.bounds.get_or_default()
    }

    /// Reserves after rewards as of the last reprice
    pub fn total_value_deposited(&self) -> U256 {
        self.total_value_deposited.get_or_default()
    }

    /// Get the proof-of-reserves feed, if configured
    pub fn reserves_attestation(&self) -> Option<Address> {
        self.reserves_attestation.get().flatten()
    }

    /// Get the attestation tolerance
    pub fn reserves_tolerance(&self) -> U256 {
        self.reserves_tolerance.get_or_default()
    }

    /// Get the oldest accepted attestation age, in milliseconds
    pub fn reserves_max_staleness(&self) -> u64 {
        self.reserves_max_staleness.get_or_default()
    }

    /// Get the treasury reward recipient
    pub fn treasury(&self) -> Address {
        self.treasury.get_or_revert_with(RepricingError::AddressNull)
    }

    /// Get the liquid token address
    pub fn liquid_token(&self) -> Address {
        self.liquid_token.get_or_revert_with(RepricingError::AddressNull)
    }

    /// Get the operator registry address
    pub fn operator_registry(&self) -> Address {
        self.operator_registry.get_or_revert_with(RepricingError::AddressNull)
    }

    /// Contract identity, for checking a deployment is the expected implementation
    pub fn implementation_name(&self) -> String {
        String::from("RateEngine")
    }

    /// Crate version this contract was built from
    pub fn implementation_version(&self) -> String {
        String::from(env!("CARGO_PKG_VERSION"))
    }

    // Access control

    /// Get the current owner
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Get the proposed owner, if a handover is in progress
    pub fn pending_owner(&self) -> Option<Address> {
        self.access.pending_owner()
    }

    /// Check whether `account` holds `role`
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.access.has_role(role, account)
    }

    /// Grant a role (owner only)
    pub fn grant_role(&mut self, role: Role, account: Address) {
        self.access.grant_role(role, account);
    }

    /// Revoke a role (owner only)
    pub fn revoke_role(&mut self, role: Role, account: Address) {
        self.access.revoke_role(role, account);
    }

    /// Propose a new owner (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.access.transfer_ownership(new_owner);
    }

    /// Accept a proposed ownership handover
    pub fn accept_ownership(&mut self) {
        self.access.accept_ownership();
    }

    // Internal helper functions

    fn rate_state(&self) -> RateState {
        self.state.get_or_default()
    }

    fn reserves_check(&self) -> Option<ReservesCheck> {
        self.reserves_attestation().map(|source| {
            let feed = ReservesAttestationContractRef::new(self.env(), source);
            let latest = feed.latest_value();
            ReservesCheck {
                attested: latest.value,
                attested_at: latest.timestamp,
                tolerance: self.reserves_tolerance(),
                max_staleness: self.reserves_max_staleness(),
            }
        })
    }

    fn ensure_percentage(&self, value: U256) {
        if value > wad() {
            self.env().revert(RepricingError::InvalidPercentage);
        }
    }

    /// Reentrancy lock
    fn lock(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(RepricingError::Reentrancy);
        }
        self.locked.set(true);
    }

    /// Reentrancy unlock
    fn unlock(&mut self) {
        self.locked.set(false);
    }
}
