// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::builtin::*;
use crate::dispatch::{self, Exports, MethodDescriptor};
use crate::util::chaos;
use cid::Cid;
use ipld_blockstore::BlockStore;
use runtime::{ActorCode, Runtime};
use vm::{actor_error, ActorError, MethodNum, Serialized};

/// Invokes the actor implementation registered for a code CID.
///
/// Returns `None` when no implementation is registered for the code,
/// leaving the caller to map that to its own failure mode.
pub fn invoke_code<BS, RT>(
    code: &Cid,
    rt: &mut RT,
    method: MethodNum,
    params: &Serialized,
) -> Option<Result<Serialized, ActorError>>
where
    BS: BlockStore,
    RT: Runtime<BS>,
{
    match code {
        x if x == &*SYSTEM_ACTOR_CODE_ID || x == &*SYSTEM_ACTOR_CODE_ID_V2 => {
            Some(system::Actor.invoke_method(rt, method, params))
        }
        x if x == &*INIT_ACTOR_CODE_ID || x == &*INIT_ACTOR_CODE_ID_V2 => {
            Some(init::Actor.invoke_method(rt, method, params))
        }
        x if x == &*ACCOUNT_ACTOR_CODE_ID || x == &*ACCOUNT_ACTOR_CODE_ID_V2 => {
            Some(account::Actor.invoke_method(rt, method, params))
        }
        x if x == &*CHAOS_ACTOR_CODE_ID || x == &*CHAOS_ACTOR_CODE_ID_V2 => {
            Some(chaos::Actor.invoke_method(rt, method, params))
        }
        _ => None,
    }
}

/// Returns the exports table registered for a code CID.
pub fn actor_exports(code: &Cid) -> Option<Exports> {
    match code {
        x if x == &*SYSTEM_ACTOR_CODE_ID || x == &*SYSTEM_ACTOR_CODE_ID_V2 => {
            Some(system::EXPORTS)
        }
        x if x == &*INIT_ACTOR_CODE_ID || x == &*INIT_ACTOR_CODE_ID_V2 => Some(init::EXPORTS),
        x if x == &*ACCOUNT_ACTOR_CODE_ID || x == &*ACCOUNT_ACTOR_CODE_ID_V2 => {
            Some(account::EXPORTS)
        }
        x if x == &*CHAOS_ACTOR_CODE_ID || x == &*CHAOS_ACTOR_CODE_ID_V2 => Some(chaos::EXPORTS),
        _ => None,
    }
}

/// Returns the declared parameter and return types of a method on a
/// registered actor, without executing it. Intended for tests and tools.
pub fn signature(code: &Cid, method: MethodNum) -> Result<MethodDescriptor, ActorError> {
    let exports = actor_exports(code)
        .ok_or_else(|| actor_error!(SysErrInvalidMethod; "no code registered for {}", code))?;
    dispatch::signature(exports, method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_for_registered_codes() {
        let sig = signature(&INIT_ACTOR_CODE_ID, 2).unwrap();
        assert_eq!(sig.name, "Exec");
        assert_eq!(sig.params, "ExecParams");

        let sig = signature(&ACCOUNT_ACTOR_CODE_ID_V2, 1).unwrap();
        assert_eq!(sig.name, "Constructor");

        // Method 0 is never exported.
        assert!(signature(&ACCOUNT_ACTOR_CODE_ID, 0).is_err());
        // Unregistered code.
        assert!(signature(&Cid::default(), 1).is_err());
    }
}
