//! Tests for the deposit ledger

use odra::prelude::*;
use odra::casper_types::U256;
use odra::host::{Deployer, HostEnv, NoArgs};
use crate::access::{null_address, AccessError};
use crate::ledger::deposit_manager::{DepositManagerHostRef, DepositManagerInitArgs};
use crate::ledger::{DepositManager, Deposited, LedgerError, SupportedTokenConfig};
use crate::tokens::{
    FeeOnTransferToken, FeeOnTransferTokenInitArgs, ReentrantToken, TestToken, TestTokenHostRef,
};
use crate::whitelist::Whitelist;

const BOTH: SupportedTokenConfig = SupportedTokenConfig {
    deposit_enabled: true,
    withdraw_enabled: true,
};

struct Fixture {
    env: HostEnv,
    manager: DepositManagerHostRef,
    token: TestTokenHostRef,
    owner: Address,
    user: Address,
}

impl Fixture {
    fn token_address(&self) -> Address {
        self.token.address().clone()
    }

    fn manager_address(&self) -> Address {
        self.manager.address().clone()
    }

    /// Fund `account` and approve the manager to pull `amount`
    fn fund(&mut self, account: Address, amount: U256) {
        let manager = self.manager_address();
        self.token.mint(account, amount);
        self.env.set_caller(account);
        self.token.approve(manager, amount);
    }

    fn deposit(&mut self, account: Address, amount: U256) {
        self.fund(account, amount);
        let token = self.token_address();
        self.env.set_caller(account);
        self.manager.deposit(token, amount, account);
    }
}

fn setup() -> Fixture {
    let env = odra_test::env();
    let owner = env.get_account(0);
    let user = env.get_account(1);

    env.set_caller(owner);
    let mut manager = DepositManager::deploy(&env, DepositManagerInitArgs { owner });
    let token = TestToken::deploy(&env, NoArgs);
    manager.set_supported_token(token.address().clone(), BOTH);

    Fixture { env, manager, token, owner, user }
}

#[test]
fn test_deposit_withdraw_overdraft_scenario() {
    let mut f = setup();
    let token = f.token_address();
    let user = f.user;

    f.deposit(user, U256::from(1000));
    assert_eq!(f.manager.staked_balance(user, token), U256::from(1000));
    assert_eq!(f.manager.total_staked(token), U256::from(1000));

    f.env.set_caller(user);
    f.manager.withdraw(token, U256::from(400), user);
    assert_eq!(f.manager.staked_balance(user, token), U256::from(600));
    assert_eq!(f.manager.total_staked(token), U256::from(600));
    assert_eq!(f.token.balance_of(user), U256::from(400));

    assert_eq!(
        f.manager.try_withdraw(token, U256::from(700), user),
        Err(LedgerError::InsufficientBalance.into())
    );
    assert_eq!(f.manager.staked_balance(user, token), U256::from(600));
    assert_eq!(f.manager.total_staked(token), U256::from(600));
    assert!(f.env.emitted(&f.manager, "Withdrawn"));
}

#[test]
fn test_deposit_input_validation() {
    let mut f = setup();
    let token = f.token_address();
    let user = f.user;
    f.fund(user, U256::from(1000));

    f.env.set_caller(user);
    assert_eq!(
        f.manager.try_deposit(token, U256::zero(), user),
        Err(LedgerError::AmountZero.into())
    );
    assert_eq!(
        f.manager.try_deposit(token, U256::from(10), null_address()),
        Err(LedgerError::AddressNull.into())
    );

    let unknown = f.env.get_account(7);
    assert_eq!(
        f.manager.try_deposit(unknown, U256::from(10), user),
        Err(LedgerError::TokenNotAllowed.into())
    );
    assert_eq!(f.manager.total_staked(token), U256::zero());
}

#[test]
fn test_withdraw_input_validation() {
    let mut f = setup();
    let token = f.token_address();
    let user = f.user;
    f.deposit(user, U256::from(100));

    f.env.set_caller(user);
    assert_eq!(
        f.manager.try_withdraw(token, U256::zero(), user),
        Err(LedgerError::AmountZero.into())
    );
    assert_eq!(
        f.manager.try_withdraw(token, U256::from(1), null_address()),
        Err(LedgerError::AddressNull.into())
    );

    f.env.set_caller(f.owner);
    f.manager.set_supported_token(
        token,
        SupportedTokenConfig { deposit_enabled: true, withdraw_enabled: false },
    );
    f.env.set_caller(user);
    assert_eq!(
        f.manager.try_withdraw(token, U256::from(1), user),
        Err(LedgerError::TokenNotAllowed.into())
    );
    assert_eq!(f.manager.staked_balance(user, token), U256::from(100));
}

#[test]
fn test_deposit_credits_receiver_only() {
    let mut f = setup();
    let token = f.token_address();
    let sender = f.user;
    let receiver = f.env.get_account(2);
    f.fund(sender, U256::from(500));

    f.env.set_caller(sender);
    f.manager.deposit(token, U256::from(500), receiver);
    assert_eq!(f.manager.staked_balance(sender, token), U256::zero());
    assert_eq!(f.manager.staked_balance(receiver, token), U256::from(500));

    assert_eq!(
        f.manager.try_withdraw(token, U256::from(1), sender),
        Err(LedgerError::InsufficientBalance.into())
    );

    // Withdrawal may route to any receiver.
    f.env.set_caller(receiver);
    f.manager.withdraw(token, U256::from(200), sender);
    assert_eq!(f.token.balance_of(sender), U256::from(200));
    assert_eq!(f.manager.staked_balance(receiver, token), U256::from(300));
}

#[test]
fn test_total_matches_sum_of_balances() {
    let mut f = setup();
    let token = f.token_address();
    let accounts = [f.env.get_account(1), f.env.get_account(2), f.env.get_account(3)];

    for (i, account) in accounts.iter().enumerate() {
        f.deposit(*account, U256::from(100 * (i as u64 + 1)));
    }
    f.env.set_caller(accounts[1]);
    f.manager.withdraw(token, U256::from(150), accounts[1]);
    f.env.set_caller(accounts[2]);
    f.manager.withdraw(token, U256::from(300), accounts[0]);
    f.deposit(accounts[0], U256::from(25));

    let sum = accounts
        .iter()
        .fold(U256::zero(), |acc, a| acc + f.manager.staked_balance(*a, token));
    assert_eq!(f.manager.total_staked(token), sum);
    assert_eq!(sum, U256::from(100 + 50 + 0 + 25));
    assert_eq!(f.token.balance_of(f.manager_address()), sum);
}

#[test]
fn test_fee_on_transfer_credits_received_amount() {
    let mut f = setup();
    let user = f.user;
    let manager_address = f.manager_address();

    // 1% burned on every transfer
    let mut fee_token = FeeOnTransferToken::deploy(&f.env, FeeOnTransferTokenInitArgs { fee_bps: 100 });
    let fee_token_address = fee_token.address().clone();
    f.env.set_caller(f.owner);
    f.manager.set_supported_token(fee_token_address, BOTH);

    fee_token.mint(user, U256::from(1000));
    f.env.set_caller(user);
    fee_token.approve(manager_address, U256::from(1000));
    let credited = f.manager.deposit(fee_token_address, U256::from(1000), user);

    assert_eq!(credited, U256::from(990));
    assert_eq!(f.manager.staked_balance(user, fee_token_address), U256::from(990));
    assert_eq!(f.manager.total_staked(fee_token_address), U256::from(990));
    assert_eq!(fee_token.balance_of(manager_address), U256::from(990));
    assert_eq!(f.manager.rescuable_excess(fee_token_address), U256::zero());
    assert!(f.env.emitted_event(
        &f.manager,
        Deposited {
            token: fee_token_address,
            sender: user,
            receiver: user,
            amount: U256::from(990),
        }
    ));

    // The full credited balance can still leave; the receiver eats the outbound fee.
    f.manager.withdraw(fee_token_address, U256::from(990), user);
    assert_eq!(f.manager.total_staked(fee_token_address), U256::zero());
    assert_eq!(fee_token.balance_of(manager_address), U256::zero());
}

#[test]
fn test_rescue_excess_only_moves_uncredited_tokens() {
    let mut f = setup();
    let token = f.token_address();
    let user = f.user;
    let manager_address = f.manager_address();
    f.deposit(user, U256::from(1000));

    // A direct transfer is never credited to anyone.
    f.token.mint(user, U256::from(250));
    f.env.set_caller(user);
    f.token.transfer(manager_address, U256::from(250));
    assert_eq!(f.manager.rescuable_excess(token), U256::from(250));

    assert_eq!(f.manager.try_rescue_excess(token), Err(AccessError::NotOwner.into()));

    f.env.set_caller(f.owner);
    let rescued = f.manager.rescue_excess(token);
    assert_eq!(rescued, U256::from(250));
    assert_eq!(f.token.balance_of(f.owner), U256::from(250));
    assert_eq!(f.token.balance_of(manager_address), U256::from(1000));
    assert_eq!(f.manager.staked_balance(user, token), U256::from(1000));

    // Nothing left: a zero transfer, not an error.
    assert_eq!(f.manager.rescue_excess(token), U256::zero());
    assert_eq!(f.token.balance_of(manager_address), U256::from(1000));
}

#[test]
fn test_set_supported_token_replaces_config() {
    let mut f = setup();
    let token = f.token_address();
    assert_eq!(f.manager.supported_token(token), BOTH);

    f.manager.set_supported_token(
        token,
        SupportedTokenConfig { deposit_enabled: false, withdraw_enabled: true },
    );
    let config = f.manager.supported_token(token);
    assert!(!config.deposit_enabled);
    assert!(config.withdraw_enabled);
    assert!(f.env.emitted(&f.manager, "SupportedTokenSet"));

    assert_eq!(
        f.manager.try_set_supported_token(null_address(), BOTH),
        Err(LedgerError::AddressNull.into())
    );

    f.env.set_caller(f.user);
    assert_eq!(
        f.manager.try_set_supported_token(token, BOTH),
        Err(AccessError::NotOwner.into())
    );
}

#[test]
fn test_reentrant_withdraw_is_rejected() {
    let mut f = setup();
    let user = f.user;
    let manager_address = f.manager_address();

    let mut evil = ReentrantToken::deploy(&f.env, NoArgs);
    let evil_address = evil.address().clone();
    f.env.set_caller(f.owner);
    f.manager.set_supported_token(evil_address, BOTH);

    evil.mint(user, U256::from(1000));
    f.env.set_caller(user);
    evil.approve(manager_address, U256::from(1000));
    f.manager.deposit(evil_address, U256::from(1000), user);

    evil.arm(manager_address);
    assert_eq!(
        f.manager.try_withdraw(evil_address, U256::from(400), user),
        Err(LedgerError::Reentrancy.into())
    );

    assert_eq!(f.manager.staked_balance(user, evil_address), U256::from(1000));
    assert_eq!(f.manager.total_staked(evil_address), U256::from(1000));
    assert_eq!(evil.balance_of(manager_address), U256::from(1000));
    assert_eq!(evil.balance_of(user), U256::zero());
}

#[test]
fn test_reentrant_deposit_is_rejected() {
    let mut f = setup();
    let user = f.user;
    let manager_address = f.manager_address();

    let mut evil = ReentrantToken::deploy(&f.env, NoArgs);
    let evil_address = evil.address().clone();
    f.env.set_caller(f.owner);
    f.manager.set_supported_token(evil_address, BOTH);

    evil.mint(user, U256::from(1000));
    f.env.set_caller(user);
    evil.approve(manager_address, U256::from(1000));
    evil.arm_on_pull(manager_address);
    assert_eq!(
        f.manager.try_deposit(evil_address, U256::from(1000), user),
        Err(LedgerError::Reentrancy.into())
    );

    assert_eq!(f.manager.staked_balance(user, evil_address), U256::zero());
    assert_eq!(f.manager.total_staked(evil_address), U256::zero());
    assert_eq!(evil.balance_of(manager_address), U256::zero());
    assert_eq!(evil.balance_of(user), U256::from(1000));
}

#[test]
fn test_whitelist_gates_deposits() {
    let mut f = setup();
    let token = f.token_address();
    let user = f.user;

    f.env.set_caller(f.owner);
    let mut whitelist = Whitelist::deploy(&f.env, NoArgs);
    f.manager.set_whitelist(Some(whitelist.address().clone()));
    f.fund(user, U256::from(100));

    f.env.set_caller(user);
    assert_eq!(
        f.manager.try_deposit(token, U256::from(100), user),
        Err(LedgerError::NotWhitelisted.into())
    );

    f.env.set_caller(f.owner);
    whitelist.add(user);
    f.env.set_caller(user);
    f.manager.deposit(token, U256::from(100), user);
    assert_eq!(f.manager.staked_balance(user, token), U256::from(100));

    f.env.set_caller(f.owner);
    f.manager.set_whitelist(None);
    assert_eq!(f.manager.whitelist(), None);
}

#[test]
fn test_rescue_follows_ownership_handover() {
    let mut f = setup();
    let token = f.token_address();
    let successor = f.env.get_account(4);

    f.manager.transfer_ownership(successor);
    assert_eq!(f.manager.owner(), f.owner);

    f.env.set_caller(successor);
    f.manager.accept_ownership();
    assert_eq!(f.manager.owner(), successor);
    assert_eq!(f.manager.rescue_excess(token), U256::zero());

    f.env.set_caller(f.owner);
    assert_eq!(f.manager.try_rescue_excess(token), Err(AccessError::NotOwner.into()));
}

#[test]
fn test_implementation_identity() {
    let f = setup();
    assert_eq!(f.manager.implementation_name(), "DepositManager");
    assert_eq!(f.manager.implementation_version(), env!("CARGO_PKG_VERSION"));
}
