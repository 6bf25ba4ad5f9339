//! Error definitions for ownership and role checks
use odra::prelude::*;

/// Authorization failures
#[odra::odra_error]
pub enum AccessError {
    /// Caller is not the owner
    NotOwner = 300,

    /// Caller is not the proposed owner
    NotPendingOwner = 301,

    /// Caller lacks the role required by the entry point
    MissingRole = 302,

    /// Null address supplied where an account is required
    NullAddress = 303,

    /// No ownership transfer is in progress
    NoPendingOwner = 304,
}
