//! Error definitions for repricing
use odra::prelude::*;
use crate::errors::MathError;

/// Custom errors for the rate engine
#[odra::odra_error]
pub enum RepricingError {
    /// Minimum interval since the last reprice has not elapsed
    TooSoon = 500,

    /// Snapshot reports zero pre-reward reserves
    InvalidPreRewardReserves = 501,

    /// Snapshot reports zero token supply
    ZeroSupply = 502,

    /// Reported supply is too far from the token's actual supply
    SupplyDiffTooLarge = 503,

    /// New rate moves too far from the current rate
    RateDiffTooLarge = 504,

    /// Reserves disagree with the external attestation
    ExternalReservesMismatch = 505,

    /// Node-operator reward with no active validators to receive it
    NoActiveValidators = 506,

    /// Treasury and node-operator percentages exceed 100%
    RewardPercentageTotalOverflow = 507,

    /// A percentage above 100%
    InvalidPercentage = 508,

    /// Arithmetic overflow or division by zero
    Arithmetic = 509,

    /// Nested call while a reprice is in progress
    Reentrancy = 510,

    /// Null address supplied
    AddressNull = 511,

    /// External attestation is older than the allowed staleness
    StaleReservesAttestation = 512,
}

impl From<MathError> for RepricingError {
    fn from(_: MathError) -> Self {
        RepricingError::Arithmetic
    }
}
