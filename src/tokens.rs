//! Additional CEP-18 compatible tokens for exercising the deposit manager
//! Each token is a separate type so Odra can deploy them independently
use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::events::{Transfer, Approval};
use crate::errors::TokenError;
use crate::ledger::DepositManagerContractRef;

/// Basis points denominator
const BPS: u32 = 10_000;

/// Plain token with an open faucet
#[odra::module]
pub struct TestToken {
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl TestToken {
    pub fn init(&mut self) {
        self.total_supply.set(U256::zero());
    }

    pub fn total_supply(&self) -> U256 { self.total_supply.get_or_default() }
    pub fn balance_of(&self, owner: Address) -> U256 { self.balances.get(&owner).unwrap_or_default() }
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 { self.allowances.get(&(owner, spender)).unwrap_or_default() }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.transfer_internal(caller, to, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.allowances.set(&(caller, spender), amount);
        self.env().emit_event(Approval { owner: caller, spender, value: amount });
        true
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let current_allowance = self.allowance(from, caller);
        if current_allowance < amount { self.env().revert(TokenError::InsufficientAllowance); }
        self.allowances.set(&(from, caller), current_allowance - amount);
        self.transfer_internal(from, to, amount);
        true
    }

    /// Faucet: anyone may mint
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.total_supply.set(self.total_supply() + amount);
        self.balances.set(&to, self.balance_of(to) + amount);
        self.env().emit_event(Transfer { from: self.env().self_address(), to, value: amount });
    }

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount { self.env().revert(TokenError::InsufficientBalance); }
        self.balances.set(&from, from_balance - amount);
        self.balances.set(&to, self.balance_of(to) + amount);
        self.env().emit_event(Transfer { from, to, value: amount });
    }
}

/// Deflationary token: every transfer burns `fee_bps` of the amount moved
#[odra::module]
pub struct FeeOnTransferToken {
    fee_bps: Var<u32>,
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl FeeOnTransferToken {
    pub fn init(&mut self, fee_bps: u32) {
        if fee_bps > BPS { self.env().revert(TokenError::InvalidFee); }
        self.fee_bps.set(fee_bps);
        self.total_supply.set(U256::zero());
    }

    pub fn total_supply(&self) -> U256 { self.total_supply.get_or_default() }
    pub fn balance_of(&self, owner: Address) -> U256 { self.balances.get(&owner).unwrap_or_default() }
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 { self.allowances.get(&(owner, spender)).unwrap_or_default() }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.transfer_internal(caller, to, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.allowances.set(&(caller, spender), amount);
        self.env().emit_event(Approval { owner: caller, spender, value: amount });
        true
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let current_allowance = self.allowance(from, caller);
        if current_allowance < amount { self.env().revert(TokenError::InsufficientAllowance); }
        self.allowances.set(&(from, caller), current_allowance - amount);
        self.transfer_internal(from, to, amount);
        true
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        self.total_supply.set(self.total_supply() + amount);
        self.balances.set(&to, self.balance_of(to) + amount);
        self.env().emit_event(Transfer { from: self.env().self_address(), to, value: amount });
    }

    /// Fee charged on a transfer of `amount`
    pub fn fee_for(&self, amount: U256) -> U256 {
        amount * U256::from(self.fee_bps.get_or_default()) / U256::from(BPS)
    }

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount { self.env().revert(TokenError::InsufficientBalance); }
        let fee = self.fee_for(amount);
        let received = amount - fee;
        self.balances.set(&from, from_balance - amount);
        self.balances.set(&to, self.balance_of(to) + received);
        self.total_supply.set(self.total_supply() - fee);
        self.env().emit_event(Transfer { from, to, value: received });
    }
}

/// Token that calls back into a deposit manager from inside `transfer`
#[odra::module]
pub struct ReentrantToken {
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
    /// Deposit manager to re-enter on the next outgoing transfer
    target: Var<Option<Address>>,
    /// Deposit manager to re-enter on the next pull
    pull_target: Var<Option<Address>>,
}

#[odra::module]
impl ReentrantToken {
    pub fn init(&mut self) {
        self.total_supply.set(U256::zero());
        self.target.set(None);
        self.pull_target.set(None);
    }

    pub fn total_supply(&self) -> U256 { self.total_supply.get_or_default() }
    pub fn balance_of(&self, owner: Address) -> U256 { self.balances.get(&owner).unwrap_or_default() }
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 { self.allowances.get(&(owner, spender)).unwrap_or_default() }

    /// Arm the callback against `deposit_manager`
    pub fn arm(&mut self, deposit_manager: Address) {
        self.target.set(Some(deposit_manager));
    }

    /// Arm a callback into `deposit_manager.deposit` from inside `transfer_from`
    pub fn arm_on_pull(&mut self, deposit_manager: Address) {
        self.pull_target.set(Some(deposit_manager));
    }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.transfer_internal(caller, to, amount);

        if let Some(deposit_manager) = self.target.get().flatten() {
            self.target.set(None);
            let token = self.env().self_address();
            let mut manager = DepositManagerContractRef::new(self.env(), deposit_manager);
            manager.withdraw(token, amount, to);
        }
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.allowances.set(&(caller, spender), amount);
        true
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let current_allowance = self.allowance(from, caller);
        if current_allowance < amount { self.env().revert(TokenError::InsufficientAllowance); }
        self.allowances.set(&(from, caller), current_allowance - amount);
        self.transfer_internal(from, to, amount);

        // Tokens have moved but the manager has not credited them yet.
        if let Some(deposit_manager) = self.pull_target.get().flatten() {
            self.pull_target.set(None);
            let token = self.env().self_address();
            let mut manager = DepositManagerContractRef::new(self.env(), deposit_manager);
            manager.deposit(token, amount, from);
        }
        true
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        self.total_supply.set(self.total_supply() + amount);
        self.balances.set(&to, self.balance_of(to) + amount);
    }

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount { self.env().revert(TokenError::InsufficientBalance); }
        self.balances.set(&from, from_balance - amount);
        self.balances.set(&to, self.balance_of(to) + amount);
    }
}
