//! Deposit ledger
//!
//! Tracks per-user, per-token staked balances in raw token units and keeps
//! the per-token totals solvent against the contract's actual holdings.

pub mod deposit_manager;
pub mod errors;
pub mod events;

#[cfg(test)]
mod tests;

pub use deposit_manager::{DepositManager, SupportedTokenConfig};
pub use deposit_manager::DepositManagerContractRef;
pub use errors::LedgerError;
pub use events::*;
