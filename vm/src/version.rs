// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use num_derive::FromPrimitive;
use std::fmt;

/// Epoch number of the chain, negative values only used for sentinel defaults.
pub type ChainEpoch = i64;

/// Specifies the network version, which dictates the active consensus
/// rules: price list selection, dispatch rules and actor code versions.
/// Fixed for the duration of a tipset.
#[repr(u32)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, FromPrimitive)]
pub enum NetworkVersion {
    /// genesis
    V0 = 0,
    /// breeze
    V1 = 1,
    /// smoke
    V2 = 2,
    /// ignition
    V3 = 3,
    /// actors v2
    V4 = 4,
    /// tape
    V5 = 5,
    /// kumquat
    V6 = 6,
    /// calico
    V7 = 7,
    /// persian
    V8 = 8,
}

impl Default for NetworkVersion {
    fn default() -> Self {
        NetworkVersion::V0
    }
}

impl fmt::Display for NetworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering() {
        assert!(NetworkVersion::V7 > NetworkVersion::V6);
        assert!(NetworkVersion::V0 < NetworkVersion::V4);
    }
}
