// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod gas_charge;
mod price_list;

pub use self::gas_charge::GasCharge;
pub use self::price_list::{price_list_by_network_version, PriceList};

use vm::{actor_error, ActorError};

/// Tracks the gas charged against the budget of one top-level message,
/// shared by every invocation frame the message creates.
pub struct GasTracker {
    gas_available: i64,
    gas_used: i64,
}

impl GasTracker {
    pub fn new(gas_available: i64, gas_used: i64) -> Self {
        Self {
            gas_available,
            gas_used,
        }
    }

    /// Safely consumes gas and returns an out of gas error if there is not sufficient
    /// enough gas remaining for charge.
    pub fn charge_gas(&mut self, charge: GasCharge) -> Result<(), ActorError> {
        let to_use = charge.total();
        let used = self.gas_used + to_use;
        if used > self.gas_available {
            self.gas_used = self.gas_available;
            Err(actor_error!(SysErrOutOfGas;
                    "not enough gas (used={}) (available={})",
               used, self.gas_available
            ))
        } else {
            self.gas_used = used;
            Ok(())
        }
    }

    /// Applies the charge if it fits in the remaining budget, reporting
    /// success without aborting. Used for post-invocation bookkeeping.
    pub fn try_charge_gas(&mut self, charge: GasCharge) -> bool {
        let used = self.gas_used + charge.total();
        if used > self.gas_available {
            self.gas_used = self.gas_available;
            false
        } else {
            self.gas_used = used;
            true
        }
    }

    /// Getter for gas available.
    pub fn gas_available(&self) -> i64 {
        self.gas_available
    }

    /// Getter for gas used.
    pub fn gas_used(&self) -> i64 {
        self.gas_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_gas_tracker() {
        let mut t = GasTracker::new(20, 10);
        t.charge_gas(GasCharge::new("", 5, 0)).unwrap();
        assert_eq!(t.gas_used(), 15);
        t.charge_gas(GasCharge::new("", 5, 0)).unwrap();
        assert_eq!(t.gas_used(), 20);
        assert!(t.charge_gas(GasCharge::new("", 1, 0)).is_err())
    }

    #[test]
    fn gas_used_plus_remaining_is_constant() {
        let mut t = GasTracker::new(100, 0);
        t.charge_gas(GasCharge::new("", 40, 0)).unwrap();
        assert_eq!(t.gas_used(), 40);
        assert_eq!(t.gas_available(), 100);
        // Exhaustion pins gas used to the limit.
        assert!(t.charge_gas(GasCharge::new("", 100, 0)).is_err());
        assert_eq!(t.gas_used(), 100);
    }

    #[test]
    fn try_charge_does_not_abort() {
        let mut t = GasTracker::new(10, 0);
        assert!(t.try_charge_gas(GasCharge::new("", 4, 0)));
        assert!(!t.try_charge_gas(GasCharge::new("", 100, 0)));
        assert_eq!(t.gas_used(), 10);
    }
}
