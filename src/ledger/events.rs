//! Event definitions for the deposit ledger
use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when tokens are deposited
#[odra::event]
pub struct Deposited {
    /// Token deposited
    pub token: Address,
    /// Account that supplied the tokens
    pub sender: Address,
    /// Account credited with the deposit
    pub receiver: Address,
    /// Amount actually received and credited
    pub amount: U256,
}

/// Event emitted when tokens are withdrawn
#[odra::event]
pub struct Withdrawn {
    /// Token withdrawn
    pub token: Address,
    /// Account whose balance was debited
    pub sender: Address,
    /// Account receiving the tokens
    pub receiver: Address,
    /// Amount withdrawn
    pub amount: U256,
}

/// Event emitted when uncredited tokens are swept to the owner
#[odra::event]
pub struct ExcessRescued {
    /// Token rescued
    pub token: Address,
    /// Owner receiving the excess
    pub recipient: Address,
    /// Amount rescued (may be zero)
    pub amount: U256,
}

/// Event emitted when a token's flags are replaced
#[odra::event]
pub struct SupportedTokenSet {
    /// Token configured
    pub token: Address,
    /// Deposits enabled
    pub deposit_enabled: bool,
    /// Withdrawals enabled
    pub withdraw_enabled: bool,
}

/// Event emitted when the whitelist gate changes
#[odra::event]
pub struct WhitelistSet {
    /// Previous whitelist contract
    pub old_whitelist: Option<Address>,
    /// New whitelist contract
    pub new_whitelist: Option<Address>,
}
