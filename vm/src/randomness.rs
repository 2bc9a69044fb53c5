// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use encoding::repr::*;
use serde::{Deserialize, Serialize};

/// String of random bytes usable by actor code.
#[derive(PartialEq, Eq, Default, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Randomness(#[serde(with = "serde_bytes")] pub Vec<u8>);

/// Specifies a domain for randomness generation, keeping draws for
/// distinct purposes from colliding.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Serialize_repr, Deserialize_repr)]
#[repr(i64)]
pub enum DomainSeparationTag {
    TicketProduction = 1,
    ElectionProofProduction = 2,
    WinningPoStChallengeSeed = 3,
    WindowedPoStChallengeSeed = 4,
    SealRandomness = 5,
    InteractiveSealChallengeSeed = 6,
    WindowedPoStDeadlineAssignment = 7,
    MarketDealCronSeed = 8,
    PoStChainCommit = 9,
}
