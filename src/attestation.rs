//! Reserves Feed - external proof-of-reserves attestation
//!
//! An independent reporter publishes the total reserves backing the liquid
//! staking token. The rate engine reads the latest value to cross-check
//! submitted snapshots.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::access::{AccessControl, OwnershipTransferStarted, OwnershipTransferred};

/// Latest attested reserves
#[odra::odra_type]
#[derive(Default)]
pub struct AttestedReserves {
    /// Reserves in underlying units
    pub value: U256,
    /// Block time of the report
    pub timestamp: u64,
}

/// Event emitted when a new attestation is published
#[odra::event]
pub struct ReservesReported {
    /// Reported reserves
    pub value: U256,
    /// Block time of the report
    pub timestamp: u64,
}

/// Interface the rate engine consumes
#[odra::external_contract]
pub trait ReservesAttestation {
    /// Latest attested reserves and when they were reported
    fn latest_value(&self) -> AttestedReserves;
}

/// Reserves Feed contract
#[odra::module(events = [ReservesReported, OwnershipTransferStarted, OwnershipTransferred])]
pub struct ReservesFeed {
    access: SubModule<AccessControl>,
    latest: Var<AttestedReserves>,
}

#[odra::module]
impl ReservesFeed {
    /// Initialize the feed; the owner is the reporter
    pub fn init(&mut self, owner: Address) {
        self.access.init(owner);
        self.latest.set(AttestedReserves {
            value: U256::zero(),
            timestamp: 0,
        });
    }

    /// Publish a new reserves value (owner only)
    pub fn report(&mut self, value: U256) {
        self.access.assert_owner();
        let timestamp = self.env().get_block_time();
        self.latest.set(AttestedReserves { value, timestamp });
        self.env().emit_event(ReservesReported { value, timestamp });
    }

    /// Latest attested reserves
    pub fn latest_value(&self) -> AttestedReserves {
        self.latest.get_or_default()
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessError;
    use odra::host::Deployer;

    #[test]
    fn test_report_stamps_block_time() {
        let env = odra_test::env();
        let owner = env.get_account(0);
        let mut feed = ReservesFeed::deploy(&env, ReservesFeedInitArgs { owner });
        assert_eq!(feed.latest_value().value, U256::zero());

        env.advance_block_time(5_000);
        feed.report(U256::from(101_000));
        let latest = feed.latest_value();
        assert_eq!(latest.value, U256::from(101_000));
        assert_eq!(latest.timestamp, env.block_time());

        env.set_caller(env.get_account(1));
        assert_eq!(feed.try_report(U256::one()), Err(AccessError::NotOwner.into()));
    }
}
