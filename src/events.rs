//! CEP-18 token events shared by every token in the crate
use odra::prelude::*;
use odra::casper_types::U256;

/// Balance movement. Mints use the token's own address as `from`.
#[odra::event]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Allowance set by `owner` for `spender`
#[odra::event]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    /// New allowance, replacing the previous one
    pub value: U256,
}
