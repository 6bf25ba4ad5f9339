//! Reward fee, mint amount and split arithmetic
//!
//! Every function here is pure. Amounts are floored at each step, so the
//! split never hands out more than was minted; the rounding remainder
//! simply stays unminted.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::MathError;
use crate::math::{wad, FixedPoint, SafeMath};
use crate::operators::OperatorShare;
use super::errors::RepricingError;

/// Outcome of applying a snapshot's rewards to the token supply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardComputation {
    /// Pre-reward reserves plus new rewards
    pub total_reserves: U256,
    /// Part of the new rewards kept as protocol fee
    pub reward_fee: U256,
    /// Liquid tokens minted to represent the fee
    pub liquid_to_mint: U256,
    /// Underlying per liquid token after the mint, wad-scaled
    pub new_rate: U256,
}

/// Minted liquid tokens divided between the treasury and node operators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSplit {
    pub treasury: U256,
    pub node_operators: U256,
}

impl RewardSplit {
    pub fn total(&self) -> U256 {
        self.treasury + self.node_operators
    }
}

/// Fee, mint amount and resulting rate for one snapshot
///
/// The mint is sized so that after it the fee is worth exactly its share of
/// the new reserves:
///
/// ```text
/// fee      = new_rewards * reward_percentage_total
/// mint     = supply * fee / (pre + new_rewards - fee)
/// new_rate = (pre + new_rewards) / (supply + mint)
/// ```
pub fn compute(
    pre_reward_reserves: U256,
    new_rewards: U256,
    supply: U256,
    reward_percentage_total: U256,
) -> Result<RewardComputation, MathError> {
    let total_reserves = SafeMath::add(pre_reward_reserves, new_rewards)?;
    let reward_fee = FixedPoint::apply_percentage(new_rewards, reward_percentage_total)?;
    let liquid_to_mint = if reward_fee.is_zero() {
        U256::zero()
    } else {
        SafeMath::mul_div(supply, reward_fee, SafeMath::sub(total_reserves, reward_fee)?)?
    };
    let new_rate = SafeMath::mul_div(total_reserves, wad(), SafeMath::add(supply, liquid_to_mint)?)?;

    Ok(RewardComputation {
        total_reserves,
        reward_fee,
        liquid_to_mint,
        new_rate,
    })
}

/// Divide `minted` in proportion to the two reward percentages
pub fn split(
    minted: U256,
    treasury_percentage: U256,
    node_operator_percentage: U256,
) -> Result<RewardSplit, MathError> {
    let total_percentage = SafeMath::add(treasury_percentage, node_operator_percentage)?;
    if minted.is_zero() || total_percentage.is_zero() {
        return Ok(RewardSplit {
            treasury: U256::zero(),
            node_operators: U256::zero(),
        });
    }

    Ok(RewardSplit {
        treasury: SafeMath::mul_div(minted, treasury_percentage, total_percentage)?,
        node_operators: SafeMath::mul_div(minted, node_operator_percentage, total_percentage)?,
    })
}

/// Divide the node-operator share by active validator count
///
/// Operators with no active validators receive nothing. A non-zero share
/// with nobody to receive it is an error.
pub fn distribute(
    node_operator_share: U256,
    operators: &[OperatorShare],
) -> Result<Vec<(Address, U256)>, RepricingError> {
    if node_operator_share.is_zero() {
        return Ok(Vec::new());
    }

    // Summed in U256 so the weights always add up to at most one.
    let total_active = operators
        .iter()
        .try_fold(U256::zero(), |total, share| {
            SafeMath::add(total, U256::from(share.active_validators))
        })?;
    if total_active.is_zero() {
        return Err(RepricingError::NoActiveValidators);
    }

    let mut rewards = Vec::new();
    for share in operators.iter().filter(|share| share.active_validators > 0) {
        let amount = SafeMath::mul_div(
            node_operator_share,
            U256::from(share.active_validators),
            total_active,
        )?;
        rewards.push((share.reward_address, amount));
    }
    Ok(rewards)
}

/// Percentages must each be at most 100% and together at most 100%
pub fn check_reward_percentages(
    treasury_percentage: U256,
    node_operator_percentage: U256,
) -> Result<(), RepricingError> {
    if treasury_percentage > wad() || node_operator_percentage > wad() {
        return Err(RepricingError::InvalidPercentage);
    }
    if treasury_percentage + node_operator_percentage > wad() {
        return Err(RepricingError::RewardPercentageTotalOverflow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::percent;
    use odra::casper_types::account::AccountHash;

    fn units(value: u64) -> U256 {
        U256::from(value) * wad()
    }

    fn operator(seed: u8, active_validators: u64) -> OperatorShare {
        OperatorShare {
            reward_address: Address::Account(AccountHash::new([seed; 32])),
            active_validators,
        }
    }

    #[test]
    fn test_compute_wad_scale() {
        let result = compute(units(100_000), units(1_000), units(100_000), percent(10)).unwrap();
        assert_eq!(result.total_reserves, units(101_000));
        assert_eq!(result.reward_fee, units(100));
        assert_eq!(result.liquid_to_mint, U256::from_dec_str("99108027750247770069").unwrap());
        assert_eq!(result.new_rate, U256::from(1_009_000_000_000_000_000u64));
    }

    #[test]
    fn test_compute_raw_units() {
        let result = compute(
            U256::from(100_000),
            U256::from(1_000),
            U256::from(100_000),
            percent(10),
        )
        .unwrap();
        assert_eq!(result.reward_fee, U256::from(100));
        assert_eq!(result.liquid_to_mint, U256::from(99));
        assert_eq!(result.new_rate, U256::from(1_009_001_088_921_967_252u64));
    }

    #[test]
    fn test_compute_without_fee() {
        let result = compute(units(1_000), units(10), units(1_000), U256::zero()).unwrap();
        assert_eq!(result.liquid_to_mint, U256::zero());
        assert_eq!(result.new_rate, U256::from(1_010_000_000_000_000_000u64));
    }

    #[test]
    fn test_split_floors_each_side() {
        let minted = U256::from_dec_str("99108027750247770069").unwrap();
        let split = split(minted, percent(5), percent(5)).unwrap();
        let half = U256::from_dec_str("49554013875123885034").unwrap();
        assert_eq!(split.treasury, half);
        assert_eq!(split.node_operators, half);
        assert_eq!(split.total(), minted - 1);

        let small = super::split(U256::from(99), percent(5), percent(5)).unwrap();
        assert_eq!(small.total(), U256::from(98));
    }

    #[test]
    fn test_distribute_by_active_validators() {
        let operators = [operator(1, 3), operator(2, 0), operator(3, 1)];
        let rewards = distribute(U256::from(1_000), &operators).unwrap();
        assert_eq!(rewards.len(), 2);
        assert_eq!(rewards[0].1, U256::from(750));
        assert_eq!(rewards[1].1, U256::from(250));
    }

    #[test]
    fn test_distribute_rounds_down() {
        let operators = [operator(1, 1), operator(2, 1), operator(3, 1)];
        let rewards = distribute(U256::from(100), &operators).unwrap();
        let paid: U256 = rewards.iter().fold(U256::zero(), |acc, (_, amount)| acc + *amount);
        assert_eq!(paid, U256::from(99));
    }

    #[test]
    fn test_distribute_with_extreme_counts() {
        let operators = [operator(1, u64::MAX), operator(2, 2)];
        let rewards = distribute(U256::from(1_000), &operators).unwrap();
        assert_eq!(rewards[0].1, U256::from(999));
        assert_eq!(rewards[1].1, U256::zero());

        let operators = [operator(1, u64::MAX), operator(2, u64::MAX)];
        let rewards = distribute(U256::from(1_000), &operators).unwrap();
        assert_eq!(rewards[0].1, U256::from(500));
        assert_eq!(rewards[1].1, U256::from(500));
    }

    #[test]
    fn test_distribute_needs_active_validators() {
        assert_eq!(
            distribute(U256::from(10), &[operator(1, 0)]),
            Err(RepricingError::NoActiveValidators)
        );
        assert_eq!(distribute(U256::zero(), &[]), Ok(Vec::new()));
    }

    #[test]
    fn test_percentage_limits() {
        assert!(check_reward_percentages(percent(60), percent(40)).is_ok());
        assert_eq!(
            check_reward_percentages(percent(60), percent(41)),
            Err(RepricingError::RewardPercentageTotalOverflow)
        );
        assert_eq!(
            check_reward_percentages(percent(101), U256::zero()),
            Err(RepricingError::InvalidPercentage)
        );
    }
}
