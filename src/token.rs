//! Liquid staking token and the CEP-18 interface the contracts consume
//!
//! The liquid token represents staked value that keeps earning rewards while
//! remaining transferable. Its value in the underlying asset is tracked by
//! the rate engine; the token itself only keeps balances.
use odra::prelude::*;
use odra::casper_types::U256;
use crate::access::{AccessControl, Role, OwnershipTransferStarted, OwnershipTransferred, RoleGranted, RoleRevoked};
use crate::events::{Transfer, Approval};
use crate::errors::{MathError, TokenError};

/// Liquid staking token. Minting is restricted to holders of [`Role::Minter`].
#[odra::module(events = [
    Transfer,
    Approval,
    OwnershipTransferStarted,
    OwnershipTransferred,
    RoleGranted,
    RoleRevoked
])]
pub struct LiquidToken {
    /// Owner and minters
    access: SubModule<AccessControl>,
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Token decimals
    decimals: Var<u8>,
    /// Total supply
    total_supply: Var<U256>,
    /// Balance mapping: owner -> balance
    balances: Mapping<Address, U256>,
    /// Allowance mapping: owner -> spender -> amount
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl LiquidToken {
    /// Initialize the token; the deployer becomes owner
    pub fn init(&mut self, name: String, symbol: String) {
        let caller = self.env().caller();
        self.access.init(caller);
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(18);
        self.total_supply.set(U256::zero());
    }

    /// Get the token name
    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    /// Get the token symbol
    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    /// Get the token decimals
    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    /// Get the total supply
    pub fn total_supply(&self) -> U256 {
        self.total_supply.get_or_default()
    }

    /// Get the balance of an address
    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).unwrap_or_default()
    }

    /// Get the allowance for a spender
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or_default()
    }

    /// Transfer tokens to another address
    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.transfer_internal(caller, to, amount);
        true
    }

    /// Approve a spender to spend tokens
    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.approve_internal(caller, spender, amount);
        true
    }

    /// Transfer tokens from one address to another (requires approval)
    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let current_allowance = self.allowance(from, caller);
        if current_allowance < amount {
            self.env().revert(TokenError::InsufficientAllowance);
        }

        self.approve_internal(from, caller, current_allowance - amount);
        self.transfer_internal(from, to, amount);
        true
    }

    /// Mint new tokens (minters only)
    pub fn mint(&mut self, to: Address, amount: U256) {
        if !self.access.has_role(Role::Minter, self.env().caller()) {
            self.env().revert(TokenError::MintNotAllowed);
        }

        let new_supply = self
            .total_supply()
            .checked_add(amount)
            .unwrap_or_revert_with(&self.env(), MathError::Overflow);
        self.total_supply.set(new_supply);
        // Bounded by total supply, which did not overflow.
        let current_balance = self.balance_of(to);
        self.balances.set(&to, current_balance + amount);

        self.env().emit_event(Transfer {
            from: self.env().self_address(),
            to,
            value: amount,
        });
    }

    /// Get the current owner
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Check whether `account` holds `role`
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.access.has_role(role, account)
    }

    /// Grant a role (owner only)
    pub fn grant_role(&mut self, role: Role, account: Address) {
        self.access.grant_role(role, account);
    }

    /// Revoke a role (owner only)
    pub fn revoke_role(&mut self, role: Role, account: Address) {
        self.access.revoke_role(role, account);
    }

    /// Propose a new owner (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.access.transfer_ownership(new_owner);
    }

    /// Accept a proposed ownership handover
    pub fn accept_ownership(&mut self) {
        self.access.accept_ownership();
    }

    // Internal functions

    fn transfer_internal(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(TokenError::InsufficientBalance);
        }

        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);

        self.env().emit_event(Transfer {
            from,
            to,
            value: amount,
        });
    }

    fn approve_internal(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
        self.env().emit_event(Approval {
            owner,
            spender,
            value: amount,
        });
    }
}

/// External token interface for interacting with CEP-18 tokens
#[odra::external_contract]
pub trait Cep18Token {
    /// Get the balance of an address
    fn balance_of(&self, owner: Address) -> U256;

    /// Transfer tokens
    fn transfer(&mut self, to: Address, amount: U256) -> bool;

    /// Transfer tokens from another address
    fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool;

    /// Get total supply
    fn total_supply(&self) -> U256;
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::{Deployer, HostEnv};

    fn setup() -> (HostEnv, LiquidTokenHostRef) {
        let env = odra_test::env();
        let init_args = LiquidTokenInitArgs {
            name: String::from("Liquid Staked Token"),
            symbol: String::from("lsTKN"),
        };
        let token = LiquidToken::deploy(&env, init_args);
        (env, token)
    }

    #[test]
    fn test_init() {
        let (env, token) = setup();
        assert_eq!(token.name(), "Liquid Staked Token");
        assert_eq!(token.symbol(), "lsTKN");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), U256::zero());
        assert_eq!(token.owner(), env.get_account(0));
    }

    #[test]
    fn test_mint_requires_minter_role() {
        let (env, mut token) = setup();
        let user = env.get_account(1);
        let amount = U256::from(1000);

        assert_eq!(token.try_mint(user, amount), Err(TokenError::MintNotAllowed.into()));

        token.grant_role(Role::Minter, env.get_account(0));
        token.mint(user, amount);
        assert_eq!(token.balance_of(user), amount);
        assert_eq!(token.total_supply(), amount);

        token.revoke_role(Role::Minter, env.get_account(0));
        assert_eq!(token.try_mint(user, amount), Err(TokenError::MintNotAllowed.into()));
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let (env, mut token) = setup();
        let owner = env.get_account(0);
        let user1 = env.get_account(1);
        let user2 = env.get_account(2);
        token.grant_role(Role::Minter, owner);
        token.mint(user1, U256::from(1000));

        env.set_caller(user1);
        token.approve(user2, U256::from(600));

        env.set_caller(user2);
        token.transfer_from(user1, user2, U256::from(500));
        assert_eq!(token.balance_of(user1), U256::from(500));
        assert_eq!(token.balance_of(user2), U256::from(500));
        assert_eq!(token.allowance(user1, user2), U256::from(100));
        assert_eq!(
            token.try_transfer_from(user1, user2, U256::from(200)),
            Err(TokenError::InsufficientAllowance.into())
        );
    }
}
