// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use multihash::derive::Multihash;

/// Multihash generation codes for the chain protocol. This is not an exhausting list of
/// codes used, just the ones used to generate multihashes.
#[derive(Clone, Copy, Debug, Eq, Multihash, PartialEq)]
#[mh(alloc_size = 64)]
pub enum Code {
    /// BLAKE2b-256 (32-byte hash size)
    #[mh(code = 0xb220, hasher = multihash::Blake2b256)]
    Blake2b256,

    /// Identity multihash (max 64 bytes)
    #[mh(code = 0x00, hasher = multihash::IdentityHasher::<64>)]
    Identity,
}
