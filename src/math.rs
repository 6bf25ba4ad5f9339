//! Fixed-point utilities for rates and percentages
//!
//! Rates and percentages are 1e18-scaled ("wad") integers: `WAD` is 1.0
//! for a rate and 100% for a percentage.
use odra::casper_types::U256;
use crate::errors::MathError;

/// 1e18, the fixed-point unit
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// The fixed-point unit as a `U256`
pub fn wad() -> U256 {
    U256::from(WAD)
}

/// Safe math operations for U256
pub struct SafeMath;

impl SafeMath {
    /// Safe addition with overflow check
    pub fn add(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_add(b).ok_or(MathError::Overflow)
    }

    /// Safe subtraction with underflow check
    pub fn sub(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_sub(b).ok_or(MathError::Underflow)
    }

    /// Safe multiplication with overflow check
    pub fn mul(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_mul(b).ok_or(MathError::Overflow)
    }

    /// Safe division with zero check
    pub fn div(a: U256, b: U256) -> Result<U256, MathError> {
        if b.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(a / b)
    }

    /// `a * b / denominator`, floored
    pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
        Self::div(Self::mul(a, b)?, denominator)
    }

    /// Absolute difference of two values
    pub fn abs_diff(a: U256, b: U256) -> U256 {
        if a > b { a - b } else { b - a }
    }

    /// Returns the minimum of two U256 values
    pub fn min(a: U256, b: U256) -> U256 {
        if a < b { a } else { b }
    }
}

/// Wad-scaled fixed-point operations
pub struct FixedPoint;

impl FixedPoint {
    /// `amount * pct`, where `pct` is wad-scaled. Floors.
    pub fn apply_percentage(amount: U256, pct: U256) -> Result<U256, MathError> {
        SafeMath::mul_div(amount, pct, wad())
    }

    /// `numerator / denominator` as a wad-scaled ratio. Floors.
    pub fn ratio(numerator: U256, denominator: U256) -> Result<U256, MathError> {
        SafeMath::mul_div(numerator, wad(), denominator)
    }

    /// Relative distance of `value` from `reference`, wad-scaled
    pub fn relative_diff(value: U256, reference: U256) -> Result<U256, MathError> {
        Self::ratio(SafeMath::abs_diff(value, reference), reference)
    }

    /// `1 / rate` for a wad-scaled rate
    pub fn reciprocal(rate: U256) -> Result<U256, MathError> {
        SafeMath::mul_div(wad(), wad(), rate)
    }

    /// Converts `amount` through a wad-scaled `rate`
    pub fn convert(amount: U256, rate: U256) -> Result<U256, MathError> {
        SafeMath::mul_div(amount, rate, wad())
    }
}

/// Parses a whole-number percentage into wad scale, e.g. `percent(5)` is 5%
pub fn percent(value: u64) -> U256 {
    U256::from(value) * U256::from(WAD / 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_ops() {
        assert_eq!(SafeMath::add(U256::MAX, U256::one()), Err(MathError::Overflow));
        assert_eq!(SafeMath::sub(U256::zero(), U256::one()), Err(MathError::Underflow));
        assert_eq!(SafeMath::div(U256::one(), U256::zero()), Err(MathError::DivisionByZero));
        assert_eq!(SafeMath::mul_div(U256::from(10), U256::from(3), U256::from(4)), Ok(U256::from(7)));
    }

    #[test]
    fn test_percentages() {
        assert_eq!(percent(100), wad());
        assert_eq!(FixedPoint::apply_percentage(U256::from(1000), percent(10)), Ok(U256::from(100)));
        assert_eq!(FixedPoint::ratio(U256::from(1), U256::from(4)), Ok(percent(25)));
    }

    #[test]
    fn test_relative_diff_is_symmetric_in_distance() {
        let reference = U256::from(1000);
        assert_eq!(FixedPoint::relative_diff(U256::from(1010), reference), Ok(percent(1)));
        assert_eq!(FixedPoint::relative_diff(U256::from(990), reference), Ok(percent(1)));
        assert_eq!(FixedPoint::relative_diff(reference, U256::zero()), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_reciprocal() {
        assert_eq!(FixedPoint::reciprocal(wad()), Ok(wad()));
        assert_eq!(FixedPoint::reciprocal(wad() * 2), Ok(wad() / 2));
        assert_eq!(FixedPoint::convert(U256::from(300), wad() / 3), Ok(U256::from(99)));
    }
}
