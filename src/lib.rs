#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
extern crate alloc;

// Shared building blocks
pub mod errors;
pub mod events;
pub mod math;
pub mod access;

// Deposit ledger
pub mod ledger;

// Exchange rate and reward minting
pub mod repricing;

// Liquid staking token
pub mod token;

// Collaborator contracts
pub mod operators;
pub mod whitelist;
pub mod attestation;

// Tokens for exercising the ledger
pub mod tokens;
