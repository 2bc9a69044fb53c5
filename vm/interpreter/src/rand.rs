// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::error::Error;
use vm::{ChainEpoch, DomainSeparationTag};

/// Randomness provider trait
pub trait Rand {
    /// Gets 32 bytes of randomness paramaterized by the DomainSeparationTag,
    /// ChainEpoch and entropy from the ticket chain.
    fn get_chain_randomness(
        &self,
        pers: DomainSeparationTag,
        round: ChainEpoch,
        entropy: &[u8],
    ) -> Result<[u8; 32], Box<dyn Error>>;

    /// Gets 32 bytes of randomness paramaterized by the DomainSeparationTag,
    /// ChainEpoch and entropy from the latest beacon entry.
    fn get_beacon_randomness(
        &self,
        pers: DomainSeparationTag,
        round: ChainEpoch,
        entropy: &[u8],
    ) -> Result<[u8; 32], Box<dyn Error>>;
}
