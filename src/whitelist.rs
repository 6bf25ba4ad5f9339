//! Whitelist - optional allow-list gate consulted by the deposit manager
use odra::prelude::*;
use crate::access::{AccessControl, OwnershipTransferStarted, OwnershipTransferred};

/// Custom errors for the whitelist
#[odra::odra_error]
pub enum WhitelistError {
    /// Address already whitelisted
    AlreadyWhitelisted = 700,

    /// Address not whitelisted
    NotWhitelisted = 701,
}

/// Event emitted when an address is added
#[odra::event]
pub struct AddedToWhitelist {
    pub account: Address,
}

/// Event emitted when an address is removed
#[odra::event]
pub struct RemovedFromWhitelist {
    pub account: Address,
}

/// Event emitted when the gate is switched on or off
#[odra::event]
pub struct WhitelistEnabledSet {
    pub enabled: bool,
}

/// Interface the deposit manager consumes
#[odra::external_contract]
pub trait WhitelistGate {
    /// Whether `account` may use gated operations
    fn is_whitelisted(&self, account: Address) -> bool;
}

/// Whitelist contract
#[odra::module(events = [
    AddedToWhitelist,
    RemovedFromWhitelist,
    WhitelistEnabledSet,
    OwnershipTransferStarted,
    OwnershipTransferred
])]
pub struct Whitelist {
    access: SubModule<AccessControl>,
    members: Mapping<Address, bool>,
    /// When false every account passes
    enabled: Var<bool>,
}

#[odra::module]
impl Whitelist {
    /// Initialize an enabled, empty whitelist owned by the deployer
    pub fn init(&mut self) {
        let caller = self.env().caller();
        self.access.init(caller);
        self.enabled.set(true);
    }

    /// Whether `account` passes the gate; always true when disabled
    pub fn is_whitelisted(&self, account: Address) -> bool {
        !self.enabled.get_or_default() || self.members.get(&account).unwrap_or(false)
    }

    /// Whether the gate is switched on
    pub fn is_enabled(&self) -> bool {
        self.enabled.get_or_default()
    }

    /// Add an address (owner only)
    pub fn add(&mut self, account: Address) {
        self.access.assert_owner();
        if self.members.get(&account).unwrap_or(false) {
            self.env().revert(WhitelistError::AlreadyWhitelisted);
        }
        self.members.set(&account, true);
        self.env().emit_event(AddedToWhitelist { account });
    }

    /// Remove an address (owner only)
    pub fn remove(&mut self, account: Address) {
        self.access.assert_owner();
        if !self.members.get(&account).unwrap_or(false) {
            self.env().revert(WhitelistError::NotWhitelisted);
        }
        self.members.set(&account, false);
        self.env().emit_event(RemovedFromWhitelist { account });
    }

    /// Switch the gate on or off (owner only)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.access.assert_owner();
        self.enabled.set(enabled);
        self.env().emit_event(WhitelistEnabledSet { enabled });
    }

    /// Get the current owner
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Propose a new owner (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.access.transfer_ownership(new_owner);
    }

    /// Accept a proposed ownership handover
    pub fn accept_ownership(&mut self) {
        self.access.accept_ownership();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::{Deployer, NoArgs};

    #[test]
    fn test_membership() {
        let env = odra_test::env();
        let mut whitelist = Whitelist::deploy(&env, NoArgs);
        let user = env.get_account(1);

        assert!(!whitelist.is_whitelisted(user));
        whitelist.add(user);
        assert!(whitelist.is_whitelisted(user));
        assert_eq!(whitelist.try_add(user), Err(WhitelistError::AlreadyWhitelisted.into()));

        whitelist.remove(user);
        assert!(!whitelist.is_whitelisted(user));
    }

    #[test]
    fn test_disabled_gate_admits_everyone() {
        let env = odra_test::env();
        let mut whitelist = Whitelist::deploy(&env, NoArgs);
        whitelist.set_enabled(false);
        assert!(whitelist.is_whitelisted(env.get_account(3)));
    }
}
