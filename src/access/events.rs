//! Event definitions for ownership and role changes
use odra::prelude::*;
use super::control::Role;

/// Event emitted when the owner proposes a successor
#[odra::event]
pub struct OwnershipTransferStarted {
    /// Current owner
    pub previous_owner: Address,
    /// Proposed owner, who must accept
    pub proposed_owner: Address,
}

/// Event emitted when the proposed owner accepts
#[odra::event]
pub struct OwnershipTransferred {
    /// Owner before the handover
    pub previous_owner: Address,
    /// Owner after the handover
    pub new_owner: Address,
}

/// Event emitted when a role is granted
#[odra::event]
pub struct RoleGranted {
    /// Role granted
    pub role: Role,
    /// Account receiving the role
    pub account: Address,
    /// Owner who granted it
    pub sender: Address,
}

/// Event emitted when a role is revoked
#[odra::event]
pub struct RoleRevoked {
    /// Role revoked
    pub role: Role,
    /// Account losing the role
    pub account: Address,
    /// Owner who revoked it
    pub sender: Address,
}
