// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::multihash::MultihashDigest;
use cid::{Cid, Code::Identity, RAW};
use vm::NetworkVersion;

lazy_static! {
    pub static ref SYSTEM_ACTOR_CODE_ID: Cid = make_builtin(b"fil/1/system");
    pub static ref INIT_ACTOR_CODE_ID: Cid = make_builtin(b"fil/1/init");
    pub static ref ACCOUNT_ACTOR_CODE_ID: Cid = make_builtin(b"fil/1/account");
    pub static ref CHAOS_ACTOR_CODE_ID: Cid = make_builtin(b"fil/1/chaos");

    pub static ref SYSTEM_ACTOR_CODE_ID_V2: Cid = make_builtin(b"fil/2/system");
    pub static ref INIT_ACTOR_CODE_ID_V2: Cid = make_builtin(b"fil/2/init");
    pub static ref ACCOUNT_ACTOR_CODE_ID_V2: Cid = make_builtin(b"fil/2/account");
    pub static ref CHAOS_ACTOR_CODE_ID_V2: Cid = make_builtin(b"fil/2/chaos");

    /// Set of actor code types that can represent external signing parties.
    pub static ref CALLER_TYPES_SIGNABLE: [Cid; 2] =
        [*ACCOUNT_ACTOR_CODE_ID, *ACCOUNT_ACTOR_CODE_ID_V2];
}

fn make_builtin(bz: &[u8]) -> Cid {
    Cid::new_v1(RAW, Identity.digest(bz))
}

/// The actor code version active for a network version. Selects which
/// set of builtin code CIDs new actors are created with.
pub fn actors_version_for_network(nv: NetworkVersion) -> u64 {
    if nv < NetworkVersion::V4 {
        1
    } else {
        2
    }
}

/// Returns the account actor code cid for the given actors version.
pub fn account_actor_code_id(version: u64) -> &'static Cid {
    if version == 1 {
        &ACCOUNT_ACTOR_CODE_ID
    } else {
        &ACCOUNT_ACTOR_CODE_ID_V2
    }
}

/// Tests whether a code CID is one of the account actor versions.
pub fn is_account_actor(code: &Cid) -> bool {
    code == &*ACCOUNT_ACTOR_CODE_ID || code == &*ACCOUNT_ACTOR_CODE_ID_V2
}

/// Tests whether a code CID belongs to any builtin actor version.
pub fn is_builtin_actor(code: &Cid) -> bool {
    [
        &*SYSTEM_ACTOR_CODE_ID,
        &*INIT_ACTOR_CODE_ID,
        &*ACCOUNT_ACTOR_CODE_ID,
        &*CHAOS_ACTOR_CODE_ID,
        &*SYSTEM_ACTOR_CODE_ID_V2,
        &*INIT_ACTOR_CODE_ID_V2,
        &*ACCOUNT_ACTOR_CODE_ID_V2,
        &*CHAOS_ACTOR_CODE_ID_V2,
    ]
    .contains(&code)
}

/// Tests whether a code CID names a singleton actor that may never be
/// instantiated by user messages.
pub fn is_singleton_actor(code: &Cid) -> bool {
    [
        &*SYSTEM_ACTOR_CODE_ID,
        &*INIT_ACTOR_CODE_ID,
        &*SYSTEM_ACTOR_CODE_ID_V2,
        &*INIT_ACTOR_CODE_ID_V2,
    ]
    .contains(&code)
}

/// Tests whether a code CID represents an actor that can be an external
/// principal: i.e. an account.
pub fn is_principal(code: &Cid) -> bool {
    CALLER_TYPES_SIGNABLE.iter().any(|c| c == code)
}
