//! Access Control - owner, two-step ownership handover and roles
use odra::prelude::*;
use odra::casper_types::account::AccountHash;
use super::errors::AccessError;
use super::events::*;

/// Permissions that can be granted to accounts other than the owner
#[odra::odra_type]
pub enum Role {
    /// May submit repricing snapshots
    Repricer = 1,
    /// May mint the liquid staking token
    Minter = 2,
}

/// The all-zero account, treated as "no address"
pub fn null_address() -> Address {
    Address::Account(AccountHash::new([0u8; 32]))
}

/// Whether `address` is the null account
pub fn is_null(address: &Address) -> bool {
    *address == null_address()
}

/// Access control sub-module embedded by each contract
#[odra::module]
pub struct AccessControl {
    /// Current owner
    owner: Var<Address>,
    /// Owner proposed by `transfer_ownership`, waiting to accept
    pending_owner: Var<Option<Address>>,
    /// Granted roles: (role, account) -> granted
    roles: Mapping<(Role, Address), bool>,
}

#[odra::module]
impl AccessControl {
    /// Initialize with the first owner
    pub fn init(&mut self, owner: Address) {
        if is_null(&owner) {
            self.env().revert(AccessError::NullAddress);
        }
        self.owner.set(owner);
        self.pending_owner.set(None);
    }

    /// Get the current owner
    pub fn owner(&self) -> Address {
        self.owner.get_or_revert_with(AccessError::NotOwner)
    }

    /// Get the proposed owner, if a handover is in progress
    pub fn pending_owner(&self) -> Option<Address> {
        self.pending_owner.get().flatten()
    }

    /// Check whether `account` holds `role`
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.roles.get(&(role, account)).unwrap_or(false)
    }

    /// Revert unless the caller is the owner
    pub fn assert_owner(&self) {
        if self.env().caller() != self.owner() {
            self.env().revert(AccessError::NotOwner);
        }
    }

    /// Revert unless the caller holds `role`
    pub fn assert_role(&self, role: Role) {
        if !self.has_role(role, self.env().caller()) {
            self.env().revert(AccessError::MissingRole);
        }
    }

    /// Propose a new owner. Ownership moves only once they accept.
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.assert_owner();
        if is_null(&new_owner) {
            self.env().revert(AccessError::NullAddress);
        }

        self.pending_owner.set(Some(new_owner));
        self.env().emit_event(OwnershipTransferStarted {
            previous_owner: self.owner(),
            proposed_owner: new_owner,
        });
    }

    /// Complete a handover; callable only by the proposed owner
    pub fn accept_ownership(&mut self) {
        let caller = self.env().caller();
        let pending = self
            .pending_owner()
            .unwrap_or_revert_with(&self.env(), AccessError::NoPendingOwner);
        if caller != pending {
            self.env().revert(AccessError::NotPendingOwner);
        }

        let previous_owner = self.owner();
        self.owner.set(pending);
        self.pending_owner.set(None);
        self.env().emit_event(OwnershipTransferred {
            previous_owner,
            new_owner: pending,
        });
    }

    /// Grant `role` to `account` (owner only)
    pub fn grant_role(&mut self, role: Role, account: Address) {
        self.assert_owner();
        if is_null(&account) {
            self.env().revert(AccessError::NullAddress);
        }
        self.roles.set(&(role.clone(), account), true);
        self.env().emit_event(RoleGranted {
            role,
            account,
            sender: self.env().caller(),
        });
    }

    /// Revoke `role` from `account` (owner only)
    pub fn revoke_role(&mut self, role: Role, account: Address) {
        self.assert_owner();
        self.roles.set(&(role.clone(), account), false);
        self.env().emit_event(RoleRevoked {
            role,
            account,
            sender: self.env().caller(),
        });
    }
}
