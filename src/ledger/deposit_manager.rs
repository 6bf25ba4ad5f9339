//! Deposit Manager - per-token, per-user staked balance ledger
//!
//! Users deposit supported CEP-18 tokens (raw or rate-bearing) and withdraw
//! them later. Balances are kept in raw token units, never in value, so the
//! ledger's solvency does not depend on the exchange rate.
//!
//! Solvency rules:
//! - `total_staked[token]` always equals the sum of every user's balance.
//! - Deposits credit what the contract actually received, not the nominal
//!   amount, so fee-on-transfer tokens cannot inflate the ledger.
//! - Only the surplus above `total_staked[token]` is ever rescuable.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::errors::LedgerError;
use super::events::*;
use crate::access::{self, AccessControl, OwnershipTransferStarted, OwnershipTransferred};
use crate::errors::MathError;
use crate::token::Cep18TokenContractRef;
use crate::whitelist::WhitelistGateContractRef;

/// Per-token operation flags
#[odra::odra_type]
#[derive(Default)]
pub struct SupportedTokenConfig {
    /// Whether deposits of the token are accepted
    pub deposit_enabled: bool,
    /// Whether withdrawals of the token are allowed
    pub withdraw_enabled: bool,
}

/// Deposit Manager contract
#[odra::module(events = [
    Deposited,
    Withdrawn,
    ExcessRescued,
    SupportedTokenSet,
    WhitelistSet,
    OwnershipTransferStarted,
    OwnershipTransferred
])]
pub struct DepositManager {
    /// Owner checks
    access: SubModule<AccessControl>,
    /// Token flags: token -> config
    supported_tokens: Mapping<Address, SupportedTokenConfig>,
    /// Sum of all user balances: token -> total
    total_staked: Mapping<Address, U256>,
    /// User balances: (user, token) -> balance
    staked_balances: Mapping<(Address, Address), U256>,
    /// Optional whitelist consulted on deposit
    whitelist: Var<Option<Address>>,
    /// Reentrancy lock
    locked: Var<bool>,
}

#[odra::module]
impl DepositManager {
    /// Initialize the deposit manager
    pub fn init(&mut self, owner: Address) {
        self.access.init(owner);
        self.whitelist.set(None);
        self.locked.set(false);
    }

    /// Deposit `amount` of `token` from the caller, crediting `receiver`
    ///
    /// # Returns
    /// The amount actually received and credited
    pub fn deposit(&mut self, token: Address, amount: U256, receiver: Address) -> U256 {
        self.lock();

        if amount.is_zero() {
            self.env().revert(LedgerError::AmountZero);
        }
        if access::is_null(&receiver) {
            self.env().revert(LedgerError::AddressNull);
        }
        if !self.supported_token(token).deposit_enabled {
            self.env().revert(LedgerError::TokenNotAllowed);
        }

        let caller = self.env().caller();
        self.ensure_whitelisted(caller);

        // Measure what actually arrives rather than trusting `amount`.
        let this = self.env().self_address();
        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        let balance_before = token_ref.balance_of(this);
        if !token_ref.transfer_from(caller, this, amount) {
            self.env().revert(LedgerError::TransferFailed);
        }
        let balance_after = token_ref.balance_of(this);
        if balance_after <= balance_before {
            self.env().revert(LedgerError::NothingReceived);
        }
        let received = balance_after - balance_before;

        let user_balance = self.staked_balance(receiver, token);
        let total = self.total_staked(token);
        // User balance is bounded by the total, so only the total can overflow.
        let new_total = total
            .checked_add(received)
            .unwrap_or_revert_with(&self.env(), MathError::Overflow);
        self.staked_balances.set(&(receiver, token), user_balance + received);
        self.total_staked.set(&token, new_total);

        self.env().emit_event(Deposited {
            token,
            sender: caller,
            receiver,
            amount: received,
        });

        self.unlock();
        received
    }

    /// Withdraw `amount` of the caller's staked `token` to `receiver`
    pub fn withdraw(&mut self, token: Address, amount: U256, receiver: Address) {
        self.lock();

        if amount.is_zero() {
            self.env().revert(LedgerError::AmountZero);
        }
        if access::is_null(&receiver) {
            self.env().revert(LedgerError::AddressNull);
        }
        if !self.supported_token(token).withdraw_enabled {
            self.env().revert(LedgerError::TokenNotAllowed);
        }

        let caller = self.env().caller();
        let user_balance = self.staked_balance(caller, token);
        if user_balance < amount {
            self.env().revert(LedgerError::InsufficientBalance);
        }

        // Debit before the transfer so a re-entrant call sees the reduced balance.
        let total = self.total_staked(token);
        debug_assert!(total >= user_balance);
        self.staked_balances.set(&(caller, token), user_balance - amount);
        self.total_staked.set(&token, total - amount);

        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        if !token_ref.transfer(receiver, amount) {
            self.env().revert(LedgerError::TransferFailed);
        }

        self.env().emit_event(Withdrawn {
            token,
            sender: caller,
            receiver,
            amount,
        });

        self.unlock();
    }

    /// Send the owner every unit of `token` held above the staked total
    ///
    /// # Returns
    /// The amount rescued; zero when there is no excess
    pub fn rescue_excess(&mut self, token: Address) -> U256 {
        self.access.assert_owner();
        self.lock();

        let excess = self.rescuable_excess(token);
        let owner = self.access.owner();
        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        if !token_ref.transfer(owner, excess) {
            self.env().revert(LedgerError::TransferFailed);
        }

        self.env().emit_event(ExcessRescued {
            token,
            recipient: owner,
            amount: excess,
        });

        self.unlock();
        excess
    }

    /// Replace a token's flags (owner only)
    pub fn set_supported_token(&mut self, token: Address, config: SupportedTokenConfig) {
        self.access.assert_owner();
        if access::is_null(&token) {
            self.env().revert(LedgerError::AddressNull);
        }

        let deposit_enabled = config.deposit_enabled;
        let withdraw_enabled = config.withdraw_enabled;
        self.supported_tokens.set(&token, config);
        self.env().emit_event(SupportedTokenSet {
            token,
            deposit_enabled,
            withdraw_enabled,
        });
    }

    /// Set or clear the whitelist consulted on deposit (owner only)
    pub fn set_whitelist(&mut self, whitelist: Option<Address>) {
        self.access.assert_owner();
        let old_whitelist = self.whitelist();
        self.whitelist.set(whitelist);
        self.env().emit_event(WhitelistSet {
            old_whitelist,
            new_whitelist: whitelist,
        });
    }

    // View functions

    /// Get a user's staked balance of a token
    pub fn staked_balance(&self, user: Address, token: Address) -> U256 {
        self.staked_balances.get(&(user, token)).unwrap_or_default()
    }

    /// Get the sum of all staked balances of a token
    pub fn total_staked(&self, token: Address) -> U256 {
        self.total_staked.get(&token).unwrap_or_default()
    }

    /// Get a token's flags; unknown tokens have everything disabled
    pub fn supported_token(&self, token: Address) -> SupportedTokenConfig {
        self.supported_tokens.get(&token).unwrap_or_default()
    }

    /// Tokens held by the contract that no staker is owed
    pub fn rescuable_excess(&self, token: Address) -> U256 {
        let token_ref = Cep18TokenContractRef::new(self.env(), token);
        let held = token_ref.balance_of(self.env().self_address());
        held.saturating_sub(self.total_staked(token))
    }

    /// Get the whitelist consulted on deposit, if any
    pub fn whitelist(&self) -> Option<Address> {
        self.whitelist.get().flatten()
    }

    /// Contract identity, for checking a deployment is the expected implementation
    pub fn implementation_name(&self) -> String {
        String::from("DepositManager")
    }

    /// Crate version this contract was built from
    pub fn implementation_version(&self) -> String {
        String::from(env!("CARGO_PKG_VERSION"))
    }

    /// Get the current owner
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Get the proposed owner, if a handover is in progress
    pub fn pending_owner(&self) -> Option<Address> {
        self.access.pending_owner()
    }

    /// Propose a new owner (owner only)
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.access.transfer_ownership(new_owner);
    }

    /// Accept a proposed ownership handover
    pub fn accept_ownership(&mut self) {
        self.access.accept_ownership();
    }

    // Internal helper functions

    fn ensure_whitelisted(&self, account: Address) {
        if let Some(whitelist) = self.whitelist() {
            let gate = WhitelistGateContractRef::new(self.env(), whitelist);
            if !gate.is_whitelisted(account) {
                self.env().revert(LedgerError::NotWhitelisted);
            }
        }
    }

    /// Reentrancy lock
    fn lock(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(LedgerError::Reentrancy);
        }
        self.locked.set(true);
    }

    /// Reentrancy unlock
    fn unlock(&mut self) {
        self.locked.set(false);
    }
}
