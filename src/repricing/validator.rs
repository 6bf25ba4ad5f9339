//! Snapshot admission
//!
//! [`admit`] decides whether a proposed snapshot may replace the current
//! rate. It reads nothing from storage: everything it needs arrives through
//! its arguments, and the first failing check, in this order, wins:
//!
//! 1. staleness (skipped before the first accepted snapshot)
//! 2. non-zero pre-reward reserves
//! 3. non-zero reported supply
//! 4. reported supply close to the actual supply
//! 5. new rate close to the current rate
//! 6. a fresh external attestation close to the reserves, when one is configured

use odra::casper_types::U256;
use crate::errors::MathError;
use crate::math::FixedPoint;
use super::errors::RepricingError;
use super::rewards::{self, RewardComputation};
use super::snapshot::{RateState, RepriceSnapshot, RepricingBounds};

/// Attested reserves and how far the snapshot may stray from them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservesCheck {
    pub attested: U256,
    /// Block time the attestation was reported at
    pub attested_at: u64,
    pub tolerance: U256,
    /// Oldest acceptable attestation, in milliseconds
    pub max_staleness: u64,
}

/// Chain-side facts the snapshot is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionContext {
    /// Current block time
    pub now: u64,
    /// Supply of the liquid token as the token reports it
    pub actual_supply: U256,
    pub reserves: Option<ReservesCheck>,
}

/// Why a snapshot was refused
#[derive(Debug, PartialEq)]
pub enum Rejection {
    TooSoon { remaining: u64 },
    InvalidPreRewardReserves,
    ZeroSupply,
    SupplyDiffTooLarge { diff: U256, max: U256 },
    RateDiffTooLarge { diff: U256, max: U256 },
    StaleReservesAttestation { age: u64, max: u64 },
    ExternalReservesMismatch { diff: U256, max: U256 },
    Arithmetic(MathError),
}

impl From<MathError> for Rejection {
    fn from(error: MathError) -> Self {
        Rejection::Arithmetic(error)
    }
}

impl From<Rejection> for RepricingError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::TooSoon { .. } => RepricingError::TooSoon,
            Rejection::InvalidPreRewardReserves => RepricingError::InvalidPreRewardReserves,
            Rejection::ZeroSupply => RepricingError::ZeroSupply,
            Rejection::SupplyDiffTooLarge { .. } => RepricingError::SupplyDiffTooLarge,
            Rejection::RateDiffTooLarge { .. } => RepricingError::RateDiffTooLarge,
            Rejection::StaleReservesAttestation { .. } => RepricingError::StaleReservesAttestation,
            Rejection::ExternalReservesMismatch { .. } => RepricingError::ExternalReservesMismatch,
            Rejection::Arithmetic(_) => RepricingError::Arithmetic,
        }
    }
}

/// Milliseconds left before a new snapshot is accepted
pub fn remaining_cooldown(prior: &RateState, bounds: &RepricingBounds, now: u64) -> u64 {
    if prior.last_snapshot.is_none() {
        return 0;
    }
    let elapsed = now.saturating_sub(prior.last_reprice_time);
    bounds.minimum_reprice_interval.saturating_sub(elapsed)
}

/// Check `proposed` against the prior state and return the reward outcome
pub fn admit(
    proposed: &RepriceSnapshot,
    prior: &RateState,
    bounds: &RepricingBounds,
    context: &AdmissionContext,
) -> Result<RewardComputation, Rejection> {
    let remaining = remaining_cooldown(prior, bounds, context.now);
    if remaining > 0 {
        return Err(Rejection::TooSoon { remaining });
    }

    if proposed.pre_reward_reserves.is_zero() {
        return Err(Rejection::InvalidPreRewardReserves);
    }
    if proposed.reported_supply.is_zero() {
        return Err(Rejection::ZeroSupply);
    }

    let supply_diff = FixedPoint::relative_diff(context.actual_supply, proposed.reported_supply)?;
    if supply_diff > bounds.max_supply_delta {
        return Err(Rejection::SupplyDiffTooLarge {
            diff: supply_diff,
            max: bounds.max_supply_delta,
        });
    }

    let computation = rewards::compute(
        proposed.pre_reward_reserves,
        proposed.new_rewards,
        proposed.reported_supply,
        bounds.reward_percentage_total()?,
    )?;

    let rate_diff = FixedPoint::relative_diff(computation.new_rate, prior.current_rate)?;
    if computation.new_rate.is_zero() || rate_diff > bounds.max_rate_delta {
        return Err(Rejection::RateDiffTooLarge {
            diff: rate_diff,
            max: bounds.max_rate_delta,
        });
    }

    if let Some(check) = &context.reserves {
        let age = context.now.saturating_sub(check.attested_at);
        if age > check.max_staleness {
            return Err(Rejection::StaleReservesAttestation {
                age,
                max: check.max_staleness,
            });
        }
        // A zero attestation can never vouch for non-zero reserves.
        if check.attested.is_zero() {
            return Err(Rejection::ExternalReservesMismatch {
                diff: computation.total_reserves,
                max: check.tolerance,
            });
        }
        let reserves_diff = FixedPoint::relative_diff(computation.total_reserves, check.attested)?;
        if reserves_diff > check.tolerance {
            return Err(Rejection::ExternalReservesMismatch {
                diff: reserves_diff,
                max: check.tolerance,
            });
        }
    }

    Ok(computation)
}
