//! Repricing
//!
//! Turns an off-chain yield report (a [`RepriceSnapshot`]) into an exchange
//! rate update and a reward mint. Admission is decided by the pure
//! [`validator`], reward amounts by the pure [`rewards`] functions; the
//! [`RateEngine`] contract wires them to storage, the liquid token and the
//! operator registry.

pub mod snapshot;
pub mod validator;
pub mod rewards;
pub mod rate_engine;
pub mod errors;
pub mod events;


pub use snapshot::{RateState, RepriceSnapshot, RepricingBounds};
pub use validator::{admit, AdmissionContext, Rejection, ReservesCheck};
pub use rewards::{RewardComputation, RewardSplit};
pub use rate_engine::RateEngine;
pub use errors::RepricingError;
pub use events::*;
