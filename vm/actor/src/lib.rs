// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

#[macro_use]
extern crate lazy_static;

mod builtin;
pub mod dispatch;
mod registry;
mod util;

pub use self::builtin::*;
pub use self::registry::*;
pub use self::util::*;
pub use vm::{ActorState, Serialized};

use vm::{actor_error, ActorError};

/// Used when invocation requires parameters to be an empty array of bytes.
#[inline]
pub fn check_empty_params(params: &Serialized) -> Result<(), ActorError> {
    if !params.is_empty() {
        return Err(actor_error!(ErrSerialization; "params expected to be empty"));
    }
    Ok(())
}
