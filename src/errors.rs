//! Crate-wide error definitions shared by the contracts
use odra::prelude::*;

/// Arithmetic failures raised by the fixed-point helpers
#[odra::odra_error]
pub enum MathError {
    /// Result does not fit in 256 bits
    Overflow = 1,

    /// Subtraction went below zero
    Underflow = 2,

    /// Division by zero
    DivisionByZero = 3,
}

/// Custom errors for the CEP-18 token contracts
#[odra::odra_error]
pub enum TokenError {
    /// Insufficient allowance for transfer
    InsufficientAllowance = 100,

    /// Insufficient balance for operation
    InsufficientBalance = 101,

    /// Caller may not mint
    MintNotAllowed = 102,

    /// Fee configured above 100%
    InvalidFee = 103,
}
