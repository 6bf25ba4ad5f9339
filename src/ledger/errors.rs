//! Error definitions for the deposit ledger
use odra::prelude::*;

/// Custom errors for the deposit manager
#[odra::odra_error]
pub enum LedgerError {
    /// Amount is zero
    AmountZero = 400,

    /// Null address supplied
    AddressNull = 401,

    /// Token is not enabled for this operation
    TokenNotAllowed = 402,

    /// Caller's staked balance is below the requested amount
    InsufficientBalance = 403,

    /// Nested call while an operation is in progress
    Reentrancy = 404,

    /// Token reported a failed transfer
    TransferFailed = 405,

    /// Deposit left the contract balance unchanged
    NothingReceived = 406,

    /// Caller is not on the whitelist
    NotWhitelisted = 407,
}
