// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use address::Address;
use vm::ActorID;

lazy_static! {
    /// Distinguished address of the system actor, the originator of
    /// implicit messages.
    pub static ref SYSTEM_ACTOR_ADDR: Address = Address::new_id(0);
    /// Distinguished address of the init actor, which owns the address
    /// resolution table.
    pub static ref INIT_ACTOR_ADDR: Address = Address::new_id(1);
    /// Distinguished account that burnt funds are sent to.
    pub static ref BURNT_FUNDS_ACTOR_ADDR: Address = Address::new_id(99);
}

/// Defines first available ID address after builtin actors
pub const FIRST_NON_SINGLETON_ADDR: ActorID = 100;
