//! Operator Registry - node operators and their active validator counts
//!
//! The rate engine splits the node-operator part of each reprice reward
//! across the operators listed here, weighted by active validators.

use odra::prelude::*;
use crate::access::{self, AccessControl, OwnershipTransferStarted, OwnershipTransferred};

/// Custom errors for the operator registry
#[odra::odra_error]
pub enum OperatorError {
    /// Operator already registered
    OperatorExists = 600,

    /// Operator not registered
    OperatorNotFound = 601,

    /// Null reward address
    AddressNull = 602,

    /// Total active validators would not fit in a u64
    ValidatorCountOverflow = 603,
}

/// An operator's reward address and weight
#[odra::odra_type]
pub struct OperatorShare {
    /// Address receiving the operator's reward
    pub reward_address: Address,
    /// Number of active validators run by the operator
    pub active_validators: u64,
}

/// Event emitted when an operator is registered
#[odra::event]
pub struct OperatorAdded {
    pub reward_address: Address,
}

/// Event emitted when an operator's active validator count changes
#[odra::event]
pub struct ActiveValidatorsUpdated {
    pub reward_address: Address,
    pub old_count: u64,
    pub new_count: u64,
}

/// Operator Registry contract
#[odra::module(events = [
    OperatorAdded,
    ActiveValidatorsUpdated,
    OwnershipTransferStarted,
    OwnershipTransferred
])]
pub struct OperatorRegistry {
    access: SubModule<AccessControl>,
    /// Operator list by index
    operators: Mapping<u32, Address>,
    /// Number of registered operators
    operator_count: Var<u32>,
    /// Active validators per operator
    active_validators: Mapping<Address, u64>,
    /// Registration flag per operator
    registered: Mapping<Address, bool>,
    /// Sum of all active validators
    total_active: Var<u64>,
}

#[odra::module]
impl OperatorRegistry {
    /// Initialize an empty registry owned by the deployer
    pub fn init(&mut self) {
        let caller = self.env().caller();
        self.access.init(caller);
        self.operator_count.set(0);
        self.total_active.set(0);
    }

    /// Register an operator with no active validators (owner only)
    pub fn add_operator(&mut self, reward_address: Address) {
        self.access.assert_owner();
        if access::is_null(&reward_address) {
            self.env().revert(OperatorError::AddressNull);
        }
        if self.is_registered(reward_address) {
            self.env().revert(OperatorError::OperatorExists);
        }

        let count = self.operator_count.get_or_default();
        self.operators.set(&count, reward_address);
        self.operator_count.set(count + 1);
        self.registered.set(&reward_address, true);
        self.env().emit_event(OperatorAdded { reward_address });
    }

    /// Set how many validators an operator has running (owner only)
    pub fn set_active_validators(&mut self, reward_address: Address, count: u64) {
        self.access.assert_owner();
        if !self.is_registered(reward_address) {
            self.env().revert(OperatorError::OperatorNotFound);
        }

        let old_count = self.active_validators.get(&reward_address).unwrap_or_default();
        let total = self.total_active.get_or_default();
        debug_assert!(total >= old_count);
        let new_total = (total - old_count)
            .checked_add(count)
            .unwrap_or_revert_with(&self.env(), OperatorError::ValidatorCountOverflow);
        self.total_active.set(new_total);
        self.active_validators.set(&reward_address, count);
        self.env().emit_event(ActiveValidatorsUpdated {
            reward_address,
            old_count,
            new_count: count,
        });
    }

    /// Operators with at least one active validator
    pub fn reward_shares(&self) -> Vec<OperatorShare> {
        let count = self.operator_count.get_or_default();
        let mut shares = Vec::new();
        for i in 0..count {
            if let Some(reward_address) = self.operators.get(&i) {
                let active_validators = self.active_validators.get(&reward_address).unwrap_or_default();
                if active_validators > 0 {
                    shares.push(OperatorShare { reward_address, active_validators });
                }
            }
        }
        shares
    }

    /// Sum of active validators over all operators
    pub fn total_active_validators(&self) -> u64 {
        self.total_active.get_or_default()
    }

    /// Number of registered operators
    pub fn operator_count(&self) -> u32 {
        self.operator_count.get_or_default()
    }

    /// Check whether an operator is registered
    pub fn is_registered(&self, reward_address: Address) -> bool {
        self.registered.get(&reward_address).unwrap_or(false)
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
